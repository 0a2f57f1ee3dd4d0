use std::sync::mpsc::Sender;

use log::{debug, info, warn};

use crate::{
    HomeboundError,
    directions::{RouteOutcome, RouteRequest, RouteUpdate},
    location::{LocationEvent, PositionFix},
};

use super::{Coordinate, NavigationEvent, NavigationOutput, NavigationState, RenderState};

/// Drives the navigation state from incoming events.
///
/// Every new position (except the sentinel) issues a numbered route request.
/// Route results are applied only when they answer a newer request than the
/// last applied one, so a slow response can never overwrite a fresher route.
pub struct Navigator {
    state: NavigationState,
    request_sender: Option<Sender<RouteRequest>>,
    record_sender: Option<Sender<NavigationOutput>>,
    next_seq: u64,
    last_applied_seq: u64,
}

impl Navigator {
    pub fn new(
        state: NavigationState,
        request_sender: Sender<RouteRequest>,
        record_sender: Option<Sender<NavigationOutput>>,
    ) -> Self {
        Self {
            state,
            request_sender: Some(request_sender),
            record_sender,
            next_seq: 1,
            last_applied_seq: 0,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn render(&self) -> RenderState {
        self.state.render()
    }

    pub fn zoom_in(&mut self) {
        self.state.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.state.zoom_out();
    }

    /// Sequence number of the last request that was sent, 0 when none.
    pub fn last_requested_seq(&self) -> u64 {
        self.next_seq - 1
    }

    pub fn last_applied_seq(&self) -> u64 {
        self.last_applied_seq
    }

    pub fn handle_event(&mut self, event: NavigationEvent) {
        match event {
            NavigationEvent::Location(LocationEvent::Fix(fix)) => self.apply_fix(fix),
            NavigationEvent::Location(LocationEvent::Error(description)) => {
                warn!("Location stream error: {}", description);
            }
            NavigationEvent::Location(LocationEvent::Finished) => {
                info!("Location stream finished");
            }
            NavigationEvent::Route(update) => self.apply_route_update(update),
        }
    }

    /// Stop issuing route requests. The refresher exits once it has drained
    /// the requests already queued.
    pub fn shutdown(&mut self) {
        if self.request_sender.take().is_some() {
            debug!("Route requests closed");
        }
    }

    /// Close the recorder channel so the writer can flush and finish.
    pub fn stop_recording(&mut self) {
        self.record_sender = None;
    }

    fn apply_fix(&mut self, fix: PositionFix) {
        let position = Coordinate::from(&fix);
        self.state.position = position;
        self.record(NavigationOutput::Position(fix));

        if position.is_sentinel() {
            debug!("Ignoring placeholder position");
            return;
        }

        let Some(sender) = &self.request_sender else {
            debug!("Navigator shut down, not requesting a route");
            return;
        };
        let request = RouteRequest {
            seq: self.next_seq,
            start: position,
            end: self.state.destination,
        };
        match sender.send(request) {
            Ok(()) => self.next_seq += 1,
            Err(e) => warn!("Route refresher unavailable: {}", HomeboundError::from(e)),
        }
    }

    fn apply_route_update(&mut self, update: RouteUpdate) {
        if update.seq <= self.last_applied_seq {
            debug!(
                "Dropping stale route result #{} (already applied #{})",
                update.seq, self.last_applied_seq
            );
            return;
        }

        match update.outcome {
            RouteOutcome::Found(route) => {
                info!(
                    "Route #{} updated: ETA {}, {} instructions",
                    update.seq,
                    route.eta,
                    route.instructions.len()
                );
                self.last_applied_seq = update.seq;
                self.record(NavigationOutput::Route {
                    seq: update.seq,
                    route: route.clone(),
                });
                self.state.route = Some(route);
            }
            RouteOutcome::NoRoute => {
                debug!("Route #{} returned no candidates, keeping previous route", update.seq);
                self.last_applied_seq = update.seq;
            }
            RouteOutcome::Failed(reason) => {
                debug!("Route #{} failed ({}), keeping previous route", update.seq, reason);
            }
        }
    }

    fn record(&mut self, output: NavigationOutput) {
        if let Some(sender) = &self.record_sender
            && sender.send(output).is_err()
        {
            warn!("Navigation recorder stopped, no longer recording");
            self.record_sender = None;
        }
    }
}
