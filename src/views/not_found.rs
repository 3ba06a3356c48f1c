use super::ViewContext;
use crate::shell::Route;

/// Catch-all page for paths no other route matches.
pub struct NotFoundView {
    ctx: ViewContext,
    path: String,
}

impl NotFoundView {
    pub const CODE: &'static str = "404";
    pub const HEADING: &'static str = "Oops! Page Not Found";
    pub const MESSAGE: &'static str =
        "The page you are looking for does not exist or has been moved.";
    pub const ACTION_LABEL: &'static str = "Go Home";

    pub fn new(ctx: ViewContext, path: impl Into<String>) -> Self {
        Self {
            ctx,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn go_home(&self) {
        self.ctx.navigator.navigate(&Route::ProductList.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;

    #[test]
    fn test_go_home_navigates_to_list() {
        let harness = Harness::new(vec![]);
        let view = NotFoundView::new(harness.context(), "/nope");

        view.go_home();

        assert_eq!(view.path(), "/nope");
        assert_eq!(harness.navigator.pending(), vec!["/"]);
        assert_eq!(harness.repository.list_calls(), 0);
    }
}
