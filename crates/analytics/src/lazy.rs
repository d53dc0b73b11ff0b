//! Construct-once service accessor.
//!
//! A [`LazyService`] binds a constructor to its arguments and defers the call
//! until the service is first requested. The built instance is cached for the
//! lifetime of the accessor, so the constructor runs at most once per
//! successful construction.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use checkout_analytics::LazyService;
//!
//! let builds = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&builds);
//! let greeting: LazyService<String, std::convert::Infallible> =
//!     LazyService::new("greeting", "world", move |name| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!         Ok(Arc::new(format!("hello {name}")))
//!     });
//!
//! assert!(!greeting.is_initialized());
//! assert_eq!(*greeting.get().unwrap(), "hello world");
//! assert_eq!(*greeting.get().unwrap(), "hello world");
//! assert_eq!(builds.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

type Constructor<T, E> = Box<dyn Fn() -> Result<Arc<T>, E> + Send + Sync>;

/// Lazily constructed, memoized service handle.
///
/// A failed construction is returned to the caller that triggered it and
/// nothing is cached; the accessor never retries on its own.
pub struct LazyService<T: ?Sized, E> {
    name: &'static str,
    constructor: Constructor<T, E>,
    instance: Mutex<Option<Arc<T>>>,
}

impl<T: ?Sized + Send + Sync + 'static, E: 'static> LazyService<T, E> {
    /// Bind `factory` to `args` without calling it.
    pub fn new<A, F>(name: &'static str, args: A, factory: F) -> Self
    where
        A: Send + Sync + 'static,
        F: Fn(&A) -> Result<Arc<T>, E> + Send + Sync + 'static,
    {
        Self {
            name,
            constructor: Box::new(move || factory(&args)),
            instance: Mutex::new(None),
        }
    }

    /// Return the service, constructing it on first use.
    ///
    /// The lock is held during construction, so concurrent first calls still
    /// produce a single instance.
    ///
    /// # Errors
    ///
    /// Returns the constructor's error if the service is not yet built and
    /// construction fails.
    pub fn get(&self) -> Result<Arc<T>, E> {
        let mut slot = self.instance.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(instance) = slot.as_ref() {
            return Ok(Arc::clone(instance));
        }

        let instance = (self.constructor)()?;
        tracing::debug!(service = self.name, "Constructed service");
        *slot = Some(Arc::clone(&instance));
        Ok(instance)
    }

    /// Whether the service has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.instance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Name the service was registered under.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ?Sized + Send + Sync + 'static, E: 'static> fmt::Debug for LazyService<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyService")
            .field("name", &self.name)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}
