//! The skill handler trait and the invocation guard.

use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use tracing::error;

use crate::context::SkillContext;
use crate::envelope::SkillResponse;
use crate::error::HandlerError;

/// One unit of agent-invokable work.
///
/// Implementations must always resolve to a [`SkillResponse`]: validation
/// problems, store failures and missing context data all become the
/// failure envelope.
#[async_trait]
pub trait SkillHandler: Send + Sync {
    async fn handle(&self, args: Option<Value>, ctx: &SkillContext) -> SkillResponse;
}

/// Invoke `handler`, turning a panic into a failure envelope.
pub async fn invoke_guarded(
    skill_id: &str,
    handler: &dyn SkillHandler,
    args: Option<Value>,
    ctx: &SkillContext,
) -> SkillResponse {
    match AssertUnwindSafe(handler.handle(args, ctx)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            error!(skill_id = %skill_id, reason = %reason, "skill handler panicked");
            SkillResponse::from_result(Err(HandlerError::Panicked(skill_id.to_owned())))
        }
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
