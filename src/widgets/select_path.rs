//! Pick one file or directory by walking the filesystem tree.

use std::path::PathBuf;

use super::tree::{NO_MATCHES, TreeNavigator, TreeSource};
use crate::{
    core::{Context, Key, Prompt, PromptError, State, Validation, Widget},
    path_tree::FileSystem,
    theme::Theme,
};

pub struct SelectPath {
    message: String,
    source: TreeSource,
    nav: Option<TreeNavigator>,
    validation: Validation<PathBuf>,
    theme: Theme,
}

impl SelectPath {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: TreeSource::default(),
            nav: None,
            validation: Validation::new(),
            theme: Theme::current(),
        }
    }

    #[must_use]
    pub fn with_file_system<F: FileSystem + 'static>(mut self, fs: F) -> Self {
        self.source.fs = Some(Box::new(fs));
        self
    }

    /// Directory to start in. Defaults to the working directory.
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

    /// Typing narrows the current level by name.
    #[must_use]
    pub fn with_filter(mut self, filter: bool) -> Self {
        self.source.filter = filter;
        self
    }

    #[must_use]
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&PathBuf) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validation.set_validator(validator);
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn run(self) -> Result<PathBuf, PromptError> {
        Prompt::new(self).run()
    }
}

impl Widget for SelectPath {
    type Value = PathBuf;

    fn init(&mut self) -> Context<PathBuf> {
        let nav = self.source.open();
        let ctx = Context::new(nav.current_path()).with_cursor(nav.cursor());
        self.nav = Some(nav);
        ctx
    }

    fn render(&self, ctx: &Context<PathBuf>) -> String {
        let path = ctx.value.display().to_string();
        let body = match (ctx.state, &self.nav) {
            (State::Submit, _) => self.theme.dim(&path),
            (State::Cancel, _) => self.theme.struck(&path),
            (_, Some(nav)) => {
                let mut lines = nav.lines(&self.theme, false);
                lines.extend(nav.search_line(&self.theme));
                lines.join("\n")
            }
            (_, None) => String::new(),
        };

        self.theme.frame(ctx.state, &self.message, &body, &ctx.error)
    }

    fn handle_key(&mut self, ctx: &mut Context<PathBuf>, key: &Key) {
        let Some(nav) = self.nav.as_mut() else {
            return;
        };
        if nav.handle_key(key) {
            ctx.value = nav.current_path();
            ctx.cursor = nav.cursor();
        }
    }

    fn validate(&self, value: &PathBuf) -> Result<(), String> {
        if self.nav.as_ref().is_some_and(|nav| !nav.has_matches()) {
            return Err(NO_MATCHES.to_string());
        }
        self.validation.check(value)
    }
}
