//! Options for the thread that runs an implicit promise's computation

use std::io;
use std::thread;

/// Thread options for [`ImplicitPromise::spawn_with`](crate::ImplicitPromise::spawn_with).
///
/// Anything left unset falls back to the defaults of [`std::thread::Builder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnOptions {
    pub name: Option<String>,
    pub stack_size: Option<usize>,
}

impl SpawnOptions {
    pub fn new() -> SpawnOptions {
        SpawnOptions::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> SpawnOptions {
        self.name = Some(name.into());
        self
    }

    pub fn stack_size(mut self, size: usize) -> SpawnOptions {
        self.stack_size = Some(size);
        self
    }

    pub(crate) fn spawn<F>(self, f: F) -> io::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut builder = thread::Builder::new();
        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        // Detached: the computation cannot be cancelled once started.
        builder.spawn(f).map(drop)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use super::SpawnOptions;

    #[test]
    fn test_builder_sets_fields() {
        let options = SpawnOptions::new().name("fetch").stack_size(256 * 1024);
        assert_eq!(options.name.as_deref(), Some("fetch"));
        assert_eq!(options.stack_size, Some(256 * 1024));
        assert_eq!(SpawnOptions::default(), SpawnOptions::new());
    }

    #[test]
    fn test_spawn_uses_thread_name() {
        let (tx, rx) = channel();
        SpawnOptions::new()
            .name("promise-worker")
            .spawn(move || {
                tx.send(std::thread::current().name().map(str::to_owned))
                    .unwrap();
            })
            .unwrap();
        assert_eq!(rx.recv().unwrap().as_deref(), Some("promise-worker"));
    }
}
