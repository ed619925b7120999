// Email classification: inbound email to spam/ham verdict notification.
//
// The handler owns the per-event flow. The model endpoint and the notifier
// are traits so the hosted services can be swapped or stubbed in tests.

pub mod email;
pub mod endpoint;
pub mod handler;
pub mod notify;
