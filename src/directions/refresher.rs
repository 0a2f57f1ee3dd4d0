use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
};

use log::{debug, error, info};

use crate::{HomeboundError, navigation::NavigationEvent};

use super::{DirectionsProvider, RouteOutcome, RouteRequest, RouteUpdate};

/// Answer route requests until the request channel closes.
///
/// Requests that queued up while a fetch was in flight are superseded: only
/// the newest one is fetched. Failures are logged and reported as
/// [`RouteOutcome::Failed`]; nothing is retried.
pub fn refresh_routes(
    mut provider: impl DirectionsProvider,
    requests: Receiver<RouteRequest>,
    events: Sender<NavigationEvent>,
) {
    while let Ok(mut request) = requests.recv() {
        let mut superseded = 0;
        while let Ok(newer) = requests.try_recv() {
            request = newer;
            superseded += 1;
        }
        if superseded > 0 {
            debug!(
                "Skipping {} stale route requests, fetching #{}",
                superseded, request.seq
            );
        }

        let outcome = match provider.route(request.start, request.end) {
            Ok(Some(route)) => RouteOutcome::Found(route),
            Ok(None) => {
                debug!("No route found for request #{}", request.seq);
                RouteOutcome::NoRoute
            }
            Err(e) => {
                error!("Error fetching route: {}", e);
                RouteOutcome::Failed(e.to_string())
            }
        };

        let update = RouteUpdate {
            seq: request.seq,
            outcome,
        };
        if events.send(update.into()).is_err() {
            debug!("Navigation receiver dropped, stopping route refresher");
            return;
        }
    }
    info!("Route request channel closed, stopping route refresher");
}

/// Start [`refresh_routes`] on its own thread and return the request sender.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_refresher<P>(
    provider: P,
    events: Sender<NavigationEvent>,
) -> Result<(Sender<RouteRequest>, JoinHandle<()>), HomeboundError>
where
    P: DirectionsProvider + Send + 'static,
{
    let (request_tx, request_rx) = mpsc::channel::<RouteRequest>();
    let handle = thread::Builder::new()
        .name("route-refresher".to_string())
        .spawn(move || refresh_routes(provider, request_rx, events))
        .map_err(|e| HomeboundError::RuntimeInitError { source: e })?;
    Ok((request_tx, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{Coordinate, Route};
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    struct ScriptedDirections {
        answers: VecDeque<Result<Option<Route>, HomeboundError>>,
        starts: Arc<Mutex<Vec<Coordinate>>>,
    }

    impl DirectionsProvider for ScriptedDirections {
        fn route(
            &mut self,
            start: Coordinate,
            _end: Coordinate,
        ) -> Result<Option<Route>, HomeboundError> {
            self.starts.lock().unwrap().push(start);
            self.answers.pop_front().unwrap_or(Ok(None))
        }
    }

    fn create_request(seq: u64, latitude: f64) -> RouteRequest {
        RouteRequest {
            seq,
            start: Coordinate::new(latitude, 74.2),
            end: Coordinate::new(31.5, 74.3),
        }
    }

    fn collect_updates(rx: Receiver<NavigationEvent>) -> Vec<RouteUpdate> {
        rx.try_iter()
            .filter_map(|event| match event {
                NavigationEvent::Route(update) => Some(update),
                NavigationEvent::Location(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_queued_requests_are_superseded() {
        let starts = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedDirections {
            answers: VecDeque::from(vec![Ok(Some(Route::default()))]),
            starts: starts.clone(),
        };
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        for seq in 1..=3 {
            request_tx.send(create_request(seq, 31.0 + seq as f64 / 10.)).unwrap();
        }
        drop(request_tx);

        refresh_routes(provider, request_rx, event_tx);

        assert_eq!(*starts.lock().unwrap(), vec![Coordinate::new(31.0 + 3. / 10., 74.2)]);
        let updates = collect_updates(event_rx);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].seq, 3);
        assert_eq!(updates[0].outcome, RouteOutcome::Found(Route::default()));
    }

    #[test]
    fn test_outcomes_are_reported() {
        let provider = ScriptedDirections {
            answers: VecDeque::from(vec![
                Ok(None),
                Err(HomeboundError::DirectionsStatusError { status: 401 }),
            ]),
            starts: Arc::new(Mutex::new(Vec::new())),
        };
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = thread::spawn(move || refresh_routes(provider, request_rx, event_tx));
        request_tx.send(create_request(1, 31.1)).unwrap();
        let first = event_rx.recv().unwrap();
        request_tx.send(create_request(2, 31.2)).unwrap();
        let second = event_rx.recv().unwrap();
        drop(request_tx);
        handle.join().unwrap();

        assert!(matches!(
            first,
            NavigationEvent::Route(RouteUpdate {
                seq: 1,
                outcome: RouteOutcome::NoRoute
            })
        ));
        match second {
            NavigationEvent::Route(RouteUpdate {
                seq: 2,
                outcome: RouteOutcome::Failed(reason),
            }) => assert!(reason.contains("401")),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_refresher_stops_when_receiver_dropped() {
        let provider = ScriptedDirections {
            answers: VecDeque::new(),
            starts: Arc::new(Mutex::new(Vec::new())),
        };
        let (event_tx, event_rx) = mpsc::channel();
        drop(event_rx);

        let (request_tx, handle) = spawn_refresher(provider, event_tx).unwrap();
        request_tx.send(create_request(1, 31.1)).unwrap();
        handle.join().unwrap();
        // the thread is gone, so further requests cannot be delivered
        assert!(request_tx.send(create_request(2, 31.2)).is_err());
    }
}
