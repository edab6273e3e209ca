//! Pick any number of files or directories from the filesystem tree.

use std::path::PathBuf;

use super::{
    toggle,
    tree::{NO_MATCHES, TreeNavigator, TreeSource},
};
use crate::{
    core::{Context, Key, KeyName, Prompt, PromptError, State, Validation, Widget},
    path_tree::FileSystem,
    theme::Theme,
};

pub struct MultiSelectPath {
    message: String,
    source: TreeSource,
    nav: Option<TreeNavigator>,
    initial_values: Vec<PathBuf>,
    validation: Validation<Vec<PathBuf>>,
    theme: Theme,
}

impl MultiSelectPath {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: TreeSource::default(),
            nav: None,
            initial_values: Vec::new(),
            validation: Validation::new(),
            theme: Theme::current(),
        }
    }

    #[must_use]
    pub fn with_file_system<F: FileSystem + 'static>(mut self, fs: F) -> Self {
        self.source.fs = Some(Box::new(fs));
        self
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source.root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_only_directories(mut self, only_directories: bool) -> Self {
        self.source.only_directories = only_directories;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: bool) -> Self {
        self.source.filter = filter;
        self
    }

    #[must_use]
    pub fn with_initial_values(mut self, values: Vec<PathBuf>) -> Self {
        self.initial_values = values;
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.validation.set_required(required);
        self
    }

    #[must_use]
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Vec<PathBuf>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validation.set_validator(validator);
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn run(self) -> Result<Vec<PathBuf>, PromptError> {
        Prompt::new(self).run()
    }

    fn summary(values: &[PathBuf]) -> String {
        values
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Widget for MultiSelectPath {
    type Value = Vec<PathBuf>;

    fn init(&mut self) -> Context<Vec<PathBuf>> {
        let mut nav = self.source.open();
        nav.sync_selection(&self.initial_values);
        let ctx = Context::new(self.initial_values.clone()).with_cursor(nav.cursor());
        self.nav = Some(nav);
        ctx
    }

    fn render(&self, ctx: &Context<Vec<PathBuf>>) -> String {
        let body = match (ctx.state, &self.nav) {
            (State::Submit, _) => self.theme.dim(&Self::summary(&ctx.value)),
            (State::Cancel, _) => self.theme.struck(&Self::summary(&ctx.value)),
            (_, Some(nav)) => {
                let mut lines = nav.lines(&self.theme, true);
                lines.extend(nav.search_line(&self.theme));
                lines.join("\n")
            }
            (_, None) => String::new(),
        };

        self.theme.frame(ctx.state, &self.message, &body, &ctx.error)
    }

    fn handle_key(&mut self, ctx: &mut Context<Vec<PathBuf>>, key: &Key) {
        let Some(nav) = self.nav.as_mut() else {
            return;
        };

        if key.name == KeyName::Space {
            if nav.has_matches() {
                toggle(&mut ctx.value, &nav.current_path());
            }
        } else {
            nav.handle_key(key);
        }

        // Re-listed nodes start unmarked
        nav.sync_selection(&ctx.value);
        ctx.cursor = nav.cursor();
    }

    fn validate(&self, value: &Vec<PathBuf>) -> Result<(), String> {
        if self.nav.as_ref().is_some_and(|nav| !nav.has_matches()) {
            return Err(NO_MATCHES.to_string());
        }
        self.validation.check(value)
    }

    fn finalize(&mut self, ctx: &mut Context<Vec<PathBuf>>) {
        ctx.value.sort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        core::{EventKind, REQUIRED_MESSAGE},
        path_tree::{DirEntry, MemoryFileSystem},
        testing::{press, scripted},
    };

    fn project() -> MultiSelectPath {
        let fs = MemoryFileSystem::new("/repo")
            .with_dir(
                "/repo",
                vec![
                    DirEntry::file("c.txt"),
                    DirEntry::file("a.txt"),
                    DirEntry::dir("lib"),
                ],
            )
            .with_dir("/repo/lib", vec![DirEntry::file("b.rs")]);
        MultiSelectPath::new("Pick files")
            .with_file_system(fs)
            .with_theme(Theme::plain())
    }

    #[test]
    fn test_space_toggles_current_path() {
        let (mut prompt, _) = scripted(project());

        press(&mut prompt, &[KeyName::Space]);
        assert_eq!(prompt.context().value, [PathBuf::from("/repo/a.txt")]);
        assert!(prompt.frame().contains("◼ a.txt"));

        press(&mut prompt, &[KeyName::Space]);
        assert!(prompt.context().value.is_empty());
        assert!(prompt.frame().contains("◻ a.txt"));
    }

    #[test]
    fn test_space_ignored_while_search_hides_everything() {
        let (mut prompt, _) = scripted(project().with_filter(true));

        prompt.press_key(&Key::from_char('q')).unwrap();
        press(&mut prompt, &[KeyName::Space, KeyName::Enter]);

        assert!(prompt.context().value.is_empty());
        assert_eq!(prompt.context().state, State::Error);
        assert!(prompt.frame().contains(NO_MATCHES));
    }

    #[test]
    fn test_finalize_sorts_once_before_submit_render() {
        let (mut prompt, _) = scripted(project());
        let at_finalize = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&at_finalize);
        prompt.on(EventKind::Finalize, move |ctx, _| {
            seen.lock().unwrap().clone_from(&ctx.value);
        });

        // c.txt, then lib/b.rs, then a.txt
        press(&mut prompt, &[KeyName::Down, KeyName::Space]);
        press(&mut prompt, &[KeyName::Down, KeyName::Right, KeyName::Space]);
        press(&mut prompt, &[KeyName::Left, KeyName::Home, KeyName::Space]);
        assert_eq!(
            prompt.context().value,
            [
                PathBuf::from("/repo/c.txt"),
                PathBuf::from("/repo/lib/b.rs"),
                PathBuf::from("/repo/a.txt"),
            ]
        );

        press(&mut prompt, &[KeyName::Enter]);

        let sorted = vec![
            PathBuf::from("/repo/a.txt"),
            PathBuf::from("/repo/c.txt"),
            PathBuf::from("/repo/lib/b.rs"),
        ];
        assert_eq!(prompt.context().value, sorted);
        assert_eq!(*at_finalize.lock().unwrap(), sorted);
        assert!(prompt.frame().ends_with("/repo/a.txt, /repo/c.txt, /repo/lib/b.rs"));
    }

    #[test]
    fn test_marks_survive_subtree_eviction() {
        let (mut prompt, _) = scripted(project());

        press(&mut prompt, &[KeyName::End, KeyName::Right, KeyName::Space]);
        press(&mut prompt, &[KeyName::Left, KeyName::Right]);

        assert!(prompt.frame().contains("◼ b.rs"));
    }

    #[test]
    fn test_initial_values_are_marked() {
        let (prompt, _) =
            scripted(project().with_initial_values(vec![PathBuf::from("/repo/c.txt")]));

        assert!(prompt.frame().contains("◼ c.txt"));
        assert!(prompt.frame().contains("◻ a.txt"));
    }

    #[test]
    fn test_required_selection() {
        let (mut prompt, _) = scripted(project().with_required(true));

        press(&mut prompt, &[KeyName::Enter]);

        assert_eq!(prompt.context().state, State::Error);
        assert_eq!(prompt.context().error, REQUIRED_MESSAGE);
    }
}
