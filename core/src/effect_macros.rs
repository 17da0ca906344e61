//! Declarative macros for ergonomic effect construction
//!
//! [`try_effect!`] covers the "call a dependency, map the result into an
//! action" shape used by every store or email call.

/// Create an `Effect::Future` that awaits a fallible call and maps both
/// outcomes into actions
///
/// # Example
///
/// ```rust,ignore
/// use sathi_core::try_effect;
///
/// try_effect! {
///     call: repository.update_status(id, status),
///     on_success: |()| AdminAction::StatusWritten { .. },
///     on_error: |error| AdminAction::StatusWriteFailed { reason: error.to_string() }
/// }
/// ```
#[macro_export]
macro_rules! try_effect {
    (
        call: $call:expr,
        on_success: |$success_param:pat_param| $success_body:expr,
        on_error: |$error_param:ident| $error_body:expr
    ) => {
        $crate::effect::Effect::Future(::std::boxed::Box::pin(async move {
            match $call.await {
                Ok($success_param) => Some($success_body),
                Err($error_param) => Some($error_body),
            }
        }))
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        AsyncResult { value: i32 },
        Failed { reason: String },
    }

    #[tokio::test]
    async fn test_try_effect_maps_success() {
        let effect = try_effect! {
            call: async { Ok::<i32, String>(7) },
            on_success: |value| TestAction::AsyncResult { value },
            on_error: |reason| TestAction::Failed { reason }
        };

        let Effect::Future(fut) = effect else {
            unreachable!("try_effect! always builds a future");
        };
        assert_eq!(fut.await, Some(TestAction::AsyncResult { value: 7 }));
    }

    #[tokio::test]
    async fn test_try_effect_maps_error() {
        let effect = try_effect! {
            call: async { Err::<i32, String>("boom".to_string()) },
            on_success: |value| TestAction::AsyncResult { value },
            on_error: |reason| TestAction::Failed { reason }
        };

        let Effect::Future(fut) = effect else {
            unreachable!("try_effect! always builds a future");
        };
        assert_eq!(
            fut.await,
            Some(TestAction::Failed {
                reason: "boom".to_string()
            })
        );
    }
}
