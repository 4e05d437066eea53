use std::cell::Cell;
use std::future::Future;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiError;

/// Load state of a single backend read
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Loading,
    Ready(T),
    /// Static, user-facing message; the underlying error is only logged
    Failed(String),
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Resource::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Resource::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Counts the requests a hook has started, so a response can tell whether a
/// newer request has replaced it before writing state
#[derive(Debug, Default)]
pub struct RequestGeneration(Cell<u64>);

impl RequestGeneration {
    /// Start a request and return its ticket
    pub fn begin(&self) -> u64 {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.0.get() == ticket
    }
}

/// Run `fetch` on mount and whenever `deps` change.
///
/// A failed request leaves `error_message` in the handle. Only the response to
/// the latest `deps` is kept.
#[hook]
pub fn use_resource<D, T, F, Fut>(deps: D, error_message: &'static str, fetch: F) -> UseStateHandle<Resource<T>>
where
    D: PartialEq + 'static,
    T: 'static,
    F: FnOnce(&D) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let resource = use_state(|| Resource::Loading);
    let generation = use_memo((), |_| RequestGeneration::default());

    {
        let resource = resource.clone();
        use_effect_with(deps, move |deps| {
            resource.set(Resource::Loading);
            let ticket = generation.begin();
            let request = fetch(deps);
            spawn_local(async move {
                let result = request.await;
                if !generation.is_current(ticket) {
                    return;
                }
                match result {
                    Ok(value) => resource.set(Resource::Ready(value)),
                    Err(e) => {
                        log::error!("{}: {}", error_message, e);
                        resource.set(Resource::Failed(error_message.to_string()));
                    }
                }
            });
            || ()
        });
    }

    resource
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_accessors() {
        let ready = Resource::Ready(vec![1, 2, 3]);
        assert_eq!(ready.ready().map(Vec::len), Some(3));
        assert!(!ready.is_loading());
        assert_eq!(ready.error(), None);

        let failed: Resource<Vec<i32>> = Resource::Failed("Failed to load merchants".to_string());
        assert_eq!(failed.error(), Some("Failed to load merchants"));
        assert!(failed.ready().is_none());
        assert!(Resource::<()>::Loading.is_loading());
    }

    #[test]
    fn test_earlier_request_is_superseded() {
        let generation = RequestGeneration::default();
        let previous_month = generation.begin();
        let current_month = generation.begin();

        // the earlier answer arriving last must not be applied
        assert!(!generation.is_current(previous_month));
        assert!(generation.is_current(current_month));
    }
}
