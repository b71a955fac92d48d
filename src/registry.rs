//! Identity registry
//!
//! The single source of truth for who is online: a concurrency-safe
//! mapping from nickname to connection handle. Every operation takes the
//! lock once, does its work, and releases it; no I/O happens under the lock.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::client::ClientHandle;
use crate::error::RegistryError;
use crate::types::ConnId;

/// Successful outcome of [`Registry::register`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The name is now bound to the connection. `previous` holds the name
    /// it replaced, if the connection was already registered.
    Registered { previous: Option<String> },
    /// The connection already owned this name; nothing changed.
    AlreadyOwned,
}

/// Nickname → connection registry
///
/// Invariants: at most one entry per name and at most one name per
/// connection. Reverse lookups scan the map under the same lock as every
/// mutation, so no caller can observe a rename half-applied.
#[derive(Debug, Default)]
pub struct Registry {
    names: Mutex<HashMap<String, ClientHandle>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `client`
    ///
    /// Fails without mutating if `name` belongs to another connection.
    /// A connection renaming itself loses its old name in the same
    /// critical section that installs the new one.
    pub fn register(
        &self,
        client: &ClientHandle,
        name: &str,
    ) -> Result<Registration, RegistryError> {
        let mut names = self.names.lock();

        if let Some(owner) = names.get(name) {
            if owner == client {
                return Ok(Registration::AlreadyOwned);
            }
            return Err(RegistryError::NameTaken(name.to_string()));
        }

        let previous = find_name(&names, client.id());
        if let Some(old) = &previous {
            names.remove(old);
        }
        names.insert(name.to_string(), client.clone());

        debug!("Registry: {} bound to {} (total {})", name, client.id(), names.len());
        Ok(Registration::Registered { previous })
    }

    /// Reverse lookup: the name currently bound to a connection
    pub fn lookup_name_of(&self, id: ConnId) -> Option<String> {
        find_name(&self.names.lock(), id)
    }

    /// Forward lookup: the connection bound to a name
    pub fn lookup_conn_of(&self, name: &str) -> Option<ClientHandle> {
        self.names.lock().get(name).cloned()
    }

    /// All registered names, sorted
    pub fn snapshot_names(&self) -> Vec<String> {
        let mut list: Vec<String> = self.names.lock().keys().cloned().collect();
        list.sort();
        list
    }

    /// The sender's name plus every other registered connection
    ///
    /// Captured under one lock so a broadcast sees a consistent roster.
    /// Returns None if the connection has no name.
    pub fn name_and_peers(&self, id: ConnId) -> Option<(String, Vec<ClientHandle>)> {
        let names = self.names.lock();
        let sender = find_name(&names, id)?;
        let peers = names
            .values()
            .filter(|handle| handle.id() != id)
            .cloned()
            .collect();
        Some((sender, peers))
    }

    /// Drop whatever name is bound to a connection
    ///
    /// Returns the removed name; a no-op for unregistered connections.
    pub fn remove(&self, id: ConnId) -> Option<String> {
        let mut names = self.names.lock();
        let name = find_name(&names, id)?;
        names.remove(&name);
        Some(name)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.names.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Caller must hold the lock.
fn find_name(names: &HashMap<String, ClientHandle>, id: ConnId) -> Option<String> {
    names
        .iter()
        .find(|(_, handle)| handle.id() == id)
        .map(|(name, _)| name.clone())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn handle() -> ClientHandle {
        ClientHandle::channel(8).0
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = Registry::new();
        let alice = handle();

        assert_eq!(
            registry.register(&alice, "alice"),
            Ok(Registration::Registered { previous: None })
        );
        assert_eq!(registry.lookup_conn_of("alice"), Some(alice.clone()));
        assert_eq!(registry.lookup_name_of(alice.id()), Some("alice".to_string()));
    }

    #[test]
    fn test_register_taken_name_does_not_mutate() {
        let registry = Registry::new();
        let alice = handle();
        let bob = handle();
        registry.register(&alice, "alice").unwrap();
        registry.register(&bob, "bob").unwrap();

        assert_eq!(
            registry.register(&bob, "alice"),
            Err(RegistryError::NameTaken("alice".to_string()))
        );
        assert_eq!(registry.lookup_conn_of("alice"), Some(alice.clone()));
        assert_eq!(registry.lookup_name_of(bob.id()), Some("bob".to_string()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_same_name_is_noop() {
        let registry = Registry::new();
        let alice = handle();
        registry.register(&alice, "alice").unwrap();

        assert_eq!(
            registry.register(&alice, "alice"),
            Ok(Registration::AlreadyOwned)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rename_replaces_old_binding() {
        let registry = Registry::new();
        let alice = handle();
        registry.register(&alice, "alice").unwrap();

        assert_eq!(
            registry.register(&alice, "alicia"),
            Ok(Registration::Registered {
                previous: Some("alice".to_string())
            })
        );
        assert_eq!(registry.lookup_conn_of("alice"), None);
        assert_eq!(registry.lookup_name_of(alice.id()), Some("alicia".to_string()));
        assert_eq!(registry.snapshot_names(), vec!["alicia".to_string()]);
    }

    #[test]
    fn test_snapshot_names_sorted() {
        let registry = Registry::new();
        for name in ["carol", "alice", "bob"] {
            registry.register(&handle(), name).unwrap();
        }

        assert_eq!(registry.snapshot_names(), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_name_and_peers_excludes_sender() {
        let registry = Registry::new();
        let alice = handle();
        let bob = handle();
        let carol = handle();
        registry.register(&alice, "alice").unwrap();
        registry.register(&bob, "bob").unwrap();
        registry.register(&carol, "carol").unwrap();

        let (name, peers) = registry.name_and_peers(alice.id()).unwrap();
        assert_eq!(name, "alice");
        assert_eq!(peers.len(), 2);
        assert!(peers.contains(&bob));
        assert!(peers.contains(&carol));
        assert!(!peers.contains(&alice));

        assert!(registry.name_and_peers(handle().id()).is_none());
    }

    #[test]
    fn test_remove() {
        let registry = Registry::new();
        let alice = handle();
        registry.register(&alice, "alice").unwrap();

        assert_eq!(registry.remove(alice.id()), Some("alice".to_string()));
        assert_eq!(registry.remove(alice.id()), None);
        assert!(registry.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_same_name() {
        let registry = Arc::new(Registry::new());

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.register(&handle(), "dup").is_ok() })
            })
            .collect();

        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(registry.snapshot_names(), vec!["dup"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_rename_never_observed_half_applied() {
        let registry = Arc::new(Registry::new());
        let alice = handle();
        registry.register(&alice, "a0").unwrap();

        let writer = {
            let registry = registry.clone();
            let alice = alice.clone();
            tokio::spawn(async move {
                for i in 1..500 {
                    registry.register(&alice, &format!("a{}", i % 7)).unwrap();
                }
            })
        };

        let reader = {
            let registry = registry.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    // Exactly one name at all times
                    assert_eq!(registry.len(), 1);
                    assert!(registry.lookup_name_of(alice.id()).is_some());
                    tokio::task::yield_now().await;
                }
            })
        };

        writer.await.unwrap();
        reader.await.unwrap();
    }
}
