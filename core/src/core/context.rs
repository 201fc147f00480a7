// checkout_flow/src/core/context.rs

//! The `Handler<TData, Err>` type used for every step hook.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by a step handler.
pub type HandlerFuture<Err> = Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>;

/// A step handler: an async function over a clone of the run's `ContextData<TData>`.
///
/// Handlers take their locks, copy out what they need, drop the guards and only
/// then await. A handler that awaits while holding a guard will deadlock the
/// next handler that wants the same lock.
pub type Handler<TData, Err> = Box<dyn Fn(ContextData<TData>) -> HandlerFuture<Err> + Send + Sync>;
