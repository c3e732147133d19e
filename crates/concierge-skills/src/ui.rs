//! Lazy view loaders.
//!
//! Views are opaque to this crate: a loader resolves to a [`UiModule`]
//! whose `default` export names the component a renderer should mount.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Shared view for every calendar-mutating skill.
pub const CALENDAR_VIEW: &str = "calendar-view";

/// Opaque descriptor of a view component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewComponent {
    pub name: String,
}

impl ViewComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// What a UI loader resolves to.  `default` is `None` for headless skills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiModule {
    pub default: Option<ViewComponent>,
}

/// Zero-argument lazy loader of a skill's view.
pub type UiLoader = Arc<dyn Fn() -> BoxFuture<'static, UiModule> + Send + Sync>;

/// Loader that resolves to the named view.
pub fn view_loader(name: impl Into<String>) -> UiLoader {
    let name: String = name.into();
    Arc::new(move || {
        let view = ViewComponent::new(name.clone());
        Box::pin(async move {
            UiModule {
                default: Some(view),
            }
        })
    })
}

/// Loader for skills without a view.
pub fn headless_loader() -> UiLoader {
    Arc::new(|| Box::pin(async { UiModule::default() }))
}
