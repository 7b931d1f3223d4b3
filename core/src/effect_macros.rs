//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when turning a fallible async call into an
//! `Effect::Future` that maps the outcome onto a follow-up action.

/// Create an `Effect::Future` from a fallible async call
///
/// The call expression is evaluated inside an `async move` block, so every
/// value it uses is moved into the effect.
///
/// # Example
///
/// ```rust,ignore
/// use autohire_core::try_effect;
///
/// try_effect! {
///     call: api.delete_reservation(id),
///     on_success: |_unit| Some(BookingAction::DeleteReservationSucceeded { id }),
///     on_error: |error| Some(BookingAction::DeleteReservationFailed { id, message: error.user_message() })
/// }
/// ```
#[macro_export]
macro_rules! try_effect {
    (
        call: $call:expr,
        on_success: |$success_param:ident| $success_body:expr,
        on_error: |$error_param:ident| $error_body:expr
    ) => {
        $crate::effect::Effect::Future(::std::boxed::Box::pin(async move {
            match $call.await {
                ::std::result::Result::Ok($success_param) => $success_body,
                ::std::result::Result::Err($error_param) => $error_body,
            }
        }))
    };
}

/// Create an `Effect::Inline` running a local side effect without a follow-up action
///
/// # Example
///
/// ```rust,ignore
/// use autohire_core::side_effect;
///
/// side_effect!(move || storage.clear())
/// ```
#[macro_export]
macro_rules! side_effect {
    (move || $body:expr) => {
        $crate::effect::Effect::Inline(::std::boxed::Box::new(move || {
            $body;
            ::std::option::Option::None
        }))
    };
}
