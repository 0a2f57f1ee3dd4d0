use std::sync::mpsc::Sender;

use log::{error, info, warn};

use crate::{HomeboundError, navigation::NavigationEvent};

use super::{
    LocationOptions, LocationProvider, PermissionKind, PermissionPrompter, PermissionRationale,
    PermissionStatus, WatchHandle,
};

/// Owns the location subscription for the lifetime of the display.
///
/// `mount` asks for the location permission and subscribes, `teardown`
/// releases the subscription. Teardown runs at most once per mount and is
/// repeated from `Drop`, so every exit path releases the provider.
pub struct LocationWatcher {
    provider: Box<dyn LocationProvider>,
    options: LocationOptions,
    handle: Option<WatchHandle>,
}

impl LocationWatcher {
    pub fn new(provider: Box<dyn LocationProvider>, options: LocationOptions) -> Self {
        Self {
            provider,
            options,
            handle: None,
        }
    }

    /// Request the location permission and start watching the position.
    ///
    /// A denied or failed permission request is logged and the subscription
    /// is attempted anyway.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider refuses the subscription.
    pub fn mount(
        &mut self,
        prompter: &mut dyn PermissionPrompter,
        sink: Sender<NavigationEvent>,
    ) -> Result<(), HomeboundError> {
        if self.handle.is_some() {
            warn!("Location watcher already mounted");
            return Ok(());
        }

        match prompter.request(PermissionKind::FineLocation, &PermissionRationale::location()) {
            Ok(PermissionStatus::Granted) => info!("Location permission granted"),
            Ok(PermissionStatus::Denied) => warn!("Location permission denied"),
            Err(e) => warn!("Location permission request failed: {}", e),
        }

        let handle = self.provider.subscribe(&self.options, sink)?;
        info!("Watching location updates ({:?})", handle);
        self.handle = Some(handle);
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop watching the position. Safe to call any number of times.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.provider.unsubscribe(handle) {
                error!("Error while releasing location subscription: {}", e);
            } else {
                info!("Stopped watching location updates");
            }
        }
    }
}

impl Drop for LocationWatcher {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::StaticPermissionPrompter;
    use std::{cell::RefCell, rc::Rc, sync::mpsc};

    #[derive(Default)]
    struct ProviderCalls {
        subscribed: usize,
        unsubscribed: usize,
    }

    struct CountingProvider {
        calls: Rc<RefCell<ProviderCalls>>,
    }

    impl LocationProvider for CountingProvider {
        fn subscribe(
            &mut self,
            _options: &LocationOptions,
            _sink: Sender<NavigationEvent>,
        ) -> Result<WatchHandle, HomeboundError> {
            self.calls.borrow_mut().subscribed += 1;
            Ok(WatchHandle(7))
        }

        fn unsubscribe(&mut self, handle: WatchHandle) -> Result<(), HomeboundError> {
            assert_eq!(handle, WatchHandle(7));
            self.calls.borrow_mut().unsubscribed += 1;
            Ok(())
        }
    }

    struct FailingPrompter;

    impl PermissionPrompter for FailingPrompter {
        fn request(
            &mut self,
            _kind: PermissionKind,
            _rationale: &PermissionRationale,
        ) -> Result<PermissionStatus, HomeboundError> {
            Err(HomeboundError::PermissionRequestFailed {
                reason: "no activity".to_string(),
            })
        }
    }

    fn create_watcher() -> (LocationWatcher, Rc<RefCell<ProviderCalls>>) {
        let calls = Rc::new(RefCell::new(ProviderCalls::default()));
        let provider = CountingProvider {
            calls: calls.clone(),
        };
        (
            LocationWatcher::new(Box::new(provider), LocationOptions::default()),
            calls,
        )
    }

    #[test]
    fn test_mount_and_teardown_once() {
        let (mut watcher, calls) = create_watcher();
        let (tx, _rx) = mpsc::channel();

        watcher
            .mount(&mut StaticPermissionPrompter::default(), tx)
            .unwrap();
        assert!(watcher.is_mounted());

        watcher.teardown();
        watcher.teardown();
        drop(watcher);

        assert_eq!(calls.borrow().subscribed, 1);
        assert_eq!(calls.borrow().unsubscribed, 1);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let (mut watcher, calls) = create_watcher();
        let (tx, _rx) = mpsc::channel();
        watcher
            .mount(&mut StaticPermissionPrompter::default(), tx)
            .unwrap();
        drop(watcher);

        assert_eq!(calls.borrow().unsubscribed, 1);
    }

    #[test]
    fn test_teardown_without_mount() {
        let (mut watcher, calls) = create_watcher();
        watcher.teardown();
        assert_eq!(calls.borrow().unsubscribed, 0);
    }

    #[test]
    fn test_denied_permission_still_subscribes() {
        let (mut watcher, calls) = create_watcher();
        let (tx, _rx) = mpsc::channel();
        let mut prompter = StaticPermissionPrompter::new(PermissionStatus::Denied);

        watcher.mount(&mut prompter, tx).unwrap();
        assert!(watcher.is_mounted());
        assert_eq!(calls.borrow().subscribed, 1);
    }

    #[test]
    fn test_failed_permission_request_still_subscribes() {
        let (mut watcher, calls) = create_watcher();
        let (tx, _rx) = mpsc::channel();

        watcher.mount(&mut FailingPrompter, tx).unwrap();
        assert_eq!(calls.borrow().subscribed, 1);
    }

    #[test]
    fn test_second_mount_is_ignored() {
        let (mut watcher, calls) = create_watcher();
        let (tx, _rx) = mpsc::channel();

        watcher
            .mount(&mut StaticPermissionPrompter::default(), tx.clone())
            .unwrap();
        watcher
            .mount(&mut StaticPermissionPrompter::default(), tx)
            .unwrap();
        assert_eq!(calls.borrow().subscribed, 1);
    }
}
