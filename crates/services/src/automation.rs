// Copyright (c) 2024 Mike Tsao

//! Provides the automation engine as a service.

use crate::ProvidesService;
use auralis::prelude::*;
use crossbeam::channel::{Receiver, Sender, TrySendError};
use std::sync::Arc;

/// The client changes parameters through [AutomationServiceInput] messages.
#[derive(Debug)]
pub enum AutomationServiceInput {
    /// Validate and add a new parameter.
    Add(ParameterDraft),

    /// Apply a partial update to an existing parameter.
    Update(ParamUid, ParameterChanges),

    /// Remove a parameter.
    Delete(ParamUid),

    /// Turn automation on or off for one parameter.
    ToggleAutomation(ParamUid, bool),

    /// Ask for a [AutomationServiceEvent::Snapshot] right away.
    RequestSnapshot,

    /// The app is ready to quit, so the service should end.
    Quit,
}

/// The service reports back through [AutomationServiceEvent] messages.
#[derive(Debug)]
pub enum AutomationServiceEvent {
    /// A parameter was added under this uid.
    Added(ParamUid),

    /// A new parameter was rejected.
    AddFailed(ValidationError),

    /// A parameter was updated.
    Updated(ParamUid),

    /// An update was rejected, or the parameter wasn't there. The parameter
    /// (if any) is unchanged.
    UpdateFailed(ParamUid, AutomationError),

    /// A delete request finished. `existed` is false if there was nothing to
    /// delete.
    Deleted {
        #[allow(missing_docs)]
        uid: ParamUid,
        #[allow(missing_docs)]
        existed: bool,
    },

    /// A toggle request finished. `existed` is false if there was nothing to
    /// toggle.
    Toggled {
        #[allow(missing_docs)]
        uid: ParamUid,
        #[allow(missing_docs)]
        enabled: bool,
        #[allow(missing_docs)]
        existed: bool,
    },

    /// Something the user should be told about.
    Notification(Notification),

    /// The current parameter list, sent after every change and every frame.
    Snapshot(Arc<[AutomationParameter]>),

    /// The frame scheduler started (true) or stopped (false).
    SchedulerChanged(bool),

    /// The service has processed [AutomationServiceInput::Quit] and will go
    /// away shortly.
    Quit,
}

/// Wraps an [AutomationEngine] and its [AutomationScheduler] with a
/// crossbeam-channels interface.
///
/// Mutations and frame ticks are handled one at a time on the service's
/// thread, so a tick never sees a half-applied change.
///
/// At most [AutomationService::EVENT_CAPACITY] events wait in the event
/// channel. A per-frame snapshot that doesn't fit is dropped, since the next
/// frame brings a fresher one. Replies to inputs wait for room instead.
#[derive(Debug)]
pub struct AutomationService {
    inputs: CrossbeamChannel<AutomationServiceInput>,
    events: CrossbeamChannel<AutomationServiceEvent>,
}
impl ProvidesService<AutomationServiceInput, AutomationServiceEvent> for AutomationService {
    fn sender(&self) -> &Sender<AutomationServiceInput> {
        &self.inputs.sender
    }

    fn receiver(&self) -> &Receiver<AutomationServiceEvent> {
        &self.events.receiver
    }
}
impl AutomationService {
    /// How many unread events the service will queue.
    pub const EVENT_CAPACITY: usize = 256;

    /// Starts a service that drives `sink` and keeps time with the system
    /// clock.
    pub fn new_with(sink: Box<dyn AutomationSink>, settings: &AutomationSettings) -> Self {
        Self::new_with_clock(sink, Box::<SystemClock>::default(), settings)
    }

    /// Like [AutomationService::new_with()], but with a caller-supplied clock.
    pub fn new_with_clock(
        sink: Box<dyn AutomationSink>,
        clock: Box<dyn Clock>,
        settings: &AutomationSettings,
    ) -> Self {
        let r = Self {
            inputs: Default::default(),
            events: CrossbeamChannel::new_bounded(Self::EVENT_CAPACITY),
        };
        let daemon = AutomationServiceDaemon {
            receiver: r.inputs.receiver.clone(),
            sender: r.events.sender.clone(),
            engine: AutomationEngine::new_with_settings(sink, settings),
            scheduler: AutomationScheduler::new_with(clock, settings),
        };
        std::thread::spawn(move || {
            let mut daemon = daemon;
            daemon.execute();
        });
        r
    }
}

struct AutomationServiceDaemon {
    receiver: Receiver<AutomationServiceInput>,
    sender: Sender<AutomationServiceEvent>,
    engine: AutomationEngine,
    scheduler: AutomationScheduler,
}
impl AutomationServiceDaemon {
    fn execute(&mut self) {
        let inputs = self.receiver.clone();
        loop {
            // Re-fetched every pass because it changes when the scheduler
            // starts or stops.
            let frames = self.scheduler.frames().clone();
            let keep_going = crossbeam::select! {
                recv(inputs) -> input => match input {
                    Ok(AutomationServiceInput::Quit) | Err(_) => {
                        log::debug!("AutomationServiceInput::Quit");
                        self.send(AutomationServiceEvent::Quit);
                        false
                    }
                    Ok(input) => {
                        self.handle_input(input);
                        true
                    }
                },
                recv(frames) -> _ => {
                    let report = self.scheduler.tick(&mut self.engine);
                    if report.failed_deliveries > 0 {
                        log::debug!("{report:?}");
                    }
                    self.offer_frame_snapshot();
                    true
                },
            };
            if !keep_going {
                break;
            }
        }
        log::debug!("AutomationServiceDaemon exit");
    }

    fn handle_input(&mut self, input: AutomationServiceInput) {
        match input {
            AutomationServiceInput::Add(draft) => match self.engine.add(draft) {
                Ok(uid) => self.send(AutomationServiceEvent::Added(uid)),
                Err(AutomationError::Validation(e)) => {
                    self.send(AutomationServiceEvent::AddFailed(e))
                }
                Err(e) => log::warn!("unexpected failure while adding: {e}"),
            },
            AutomationServiceInput::Update(uid, changes) => {
                match self.engine.update(uid, &changes) {
                    Ok(()) => self.send(AutomationServiceEvent::Updated(uid)),
                    Err(e) => self.send(AutomationServiceEvent::UpdateFailed(uid, e)),
                }
            }
            AutomationServiceInput::Delete(uid) => {
                let existed = self.engine.delete(uid);
                self.send(AutomationServiceEvent::Deleted { uid, existed });
            }
            AutomationServiceInput::ToggleAutomation(uid, enabled) => {
                let existed = self.engine.toggle_automation(uid, enabled);
                self.send(AutomationServiceEvent::Toggled {
                    uid,
                    enabled,
                    existed,
                });
            }
            AutomationServiceInput::RequestSnapshot => {}
            AutomationServiceInput::Quit => return,
        }

        for notification in self.engine.drain_notifications() {
            self.send(AutomationServiceEvent::Notification(notification));
        }
        if self.scheduler.update_schedule(&self.engine) {
            self.send(AutomationServiceEvent::SchedulerChanged(
                self.scheduler.is_running(),
            ));
        }
        self.send_snapshot();
    }

    fn send_snapshot(&self) {
        self.send(AutomationServiceEvent::Snapshot(self.engine.parameters()));
    }

    /// Like send_snapshot(), but gives up if the client has fallen behind.
    fn offer_frame_snapshot(&self) {
        match self
            .sender
            .try_send(AutomationServiceEvent::Snapshot(self.engine.parameters()))
        {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::trace!("event queue is full; dropping this frame's snapshot")
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("no one is listening for automation events")
            }
        }
    }

    fn send(&self, event: AutomationServiceEvent) {
        if let Err(e) = self.sender.send(event) {
            log::debug!("no one is listening for automation events: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auralis::automation::{
        ConfigDraftBuilder, NullSink, ParameterChangesBuilder, ParameterDraftBuilder,
        RecordingSink, SinkCall,
    };
    use core::time::Duration;
    use float_cmp::approx_eq;
    use more_asserts::assert_le;

    const TIMEOUT: Duration = Duration::from_secs(2);

    /// Waits for the first event that `f` accepts, skipping the rest.
    fn wait_for<T>(
        s: &AutomationService,
        mut f: impl FnMut(AutomationServiceEvent) -> Option<T>,
    ) -> T {
        loop {
            match s.receiver().recv_timeout(TIMEOUT) {
                Ok(event) => {
                    if let Some(t) = f(event) {
                        return t;
                    }
                }
                Err(e) => panic!("timed out waiting for event: {e:?}"),
            }
        }
    }

    fn automated_tempo() -> ParameterDraft {
        ParameterDraftBuilder::default()
            .name("Tempo")
            .value(120.0)
            .kind("BPM")
            .automation_enabled(true)
            .automation_config(
                ConfigDraftBuilder::default()
                    .pattern("sine")
                    .min_value(60.0)
                    .max_value(180.0)
                    .speed(30.0)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn add_then_quit() {
        let _ = env_logger::builder().is_test(true).try_init();
        let s = AutomationService::new_with(
            Box::new(NullSink),
            &AutomationSettings::default(),
        );

        s.send_input(AutomationServiceInput::Add(ParameterDraft::new_with(
            "Bass",
            0.7,
            ParameterKind::BassIntensity,
        )));
        let uid = wait_for(&s, |e| match e {
            AutomationServiceEvent::Added(uid) => Some(uid),
            _ => None,
        });
        let notification = wait_for(&s, |e| match e {
            AutomationServiceEvent::Notification(n) => Some(n),
            _ => None,
        });
        assert_eq!(notification.message, "Bass has been added to automation.");
        let snapshot = wait_for(&s, |e| match e {
            AutomationServiceEvent::Snapshot(s) => Some(s),
            _ => None,
        });
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].uid(), uid);

        s.send_input(AutomationServiceInput::Quit);
        wait_for(&s, |e| match e {
            AutomationServiceEvent::Quit => Some(()),
            _ => None,
        });
    }

    #[test]
    fn rejections_are_reported() {
        let s = AutomationService::new_with(
            Box::new(NullSink),
            &AutomationSettings::default(),
        );

        s.send_input(AutomationServiceInput::Add(ParameterDraft::default()));
        let e = wait_for(&s, |e| match e {
            AutomationServiceEvent::AddFailed(e) => Some(e),
            _ => None,
        });
        assert_eq!(e.to_string(), "Name is required");
        let n = wait_for(&s, |e| match e {
            AutomationServiceEvent::Notification(n) => Some(n),
            _ => None,
        });
        assert!(n.is_failure());

        let changes = ParameterChangesBuilder::default()
            .name("Nope")
            .build()
            .unwrap();
        s.send_input(AutomationServiceInput::Update(ParamUid(777), changes));
        let e = wait_for(&s, |e| match e {
            AutomationServiceEvent::UpdateFailed(_, e) => Some(e),
            _ => None,
        });
        assert!(matches!(e, AutomationError::NotFound(ParamUid(777))));

        s.send_input(AutomationServiceInput::Delete(ParamUid(777)));
        let existed = wait_for(&s, |e| match e {
            AutomationServiceEvent::Deleted { existed, .. } => Some(existed),
            _ => None,
        });
        assert!(!existed);
        s.send_input(AutomationServiceInput::Quit);
    }

    #[test]
    fn scheduler_follows_automation() {
        let clock = ManualClock::default();
        let sink = RecordingSink::default();
        let s = AutomationService::new_with_clock(
            Box::new(sink.clone()),
            Box::new(clock.clone()),
            &AutomationSettings::default(),
        );

        clock.advance_ms(1000);
        s.send_input(AutomationServiceInput::Add(automated_tempo()));
        let uid = wait_for(&s, |e| match e {
            AutomationServiceEvent::Added(uid) => Some(uid),
            _ => None,
        });
        assert!(wait_for(&s, |e| match e {
            AutomationServiceEvent::SchedulerChanged(running) => Some(running),
            _ => None,
        }));

        // The clock is frozen at one second, half a cycle in.
        let value = wait_for(&s, |e| match e {
            AutomationServiceEvent::Snapshot(params) if params[0].value() != 120.0 => {
                Some(params[0].value())
            }
            AutomationServiceEvent::Snapshot(params) => {
                if sink.calls().is_empty() {
                    None
                } else {
                    Some(params[0].value())
                }
            }
            _ => None,
        });
        assert!(approx_eq!(f64, value, 120.0, epsilon = 1e-9));
        let SinkCall::Tempo(tempo) = sink.calls()[0] else {
            panic!("expected a tempo call");
        };
        assert!(approx_eq!(f64, tempo.0, 120.0, epsilon = 1e-9));

        s.send_input(AutomationServiceInput::ToggleAutomation(uid, false));
        assert!(!wait_for(&s, |e| match e {
            AutomationServiceEvent::SchedulerChanged(running) => Some(running),
            _ => None,
        }));

        // Once stopped, nothing else reaches the sink.
        s.send_input(AutomationServiceInput::RequestSnapshot);
        wait_for(&s, |e| match e {
            AutomationServiceEvent::Snapshot(_) => Some(()),
            _ => None,
        });
        let count = sink.calls().len();
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(sink.calls().len(), count);

        s.send_input(AutomationServiceInput::Quit);
        wait_for(&s, |e| match e {
            AutomationServiceEvent::Quit => Some(()),
            _ => None,
        });
    }

    #[test]
    fn unread_frame_snapshots_do_not_pile_up() {
        let mut settings = AutomationSettings::default();
        settings.set_frames_per_second(1000);
        let s = AutomationService::new_with(Box::new(NullSink), &settings);

        s.send_input(AutomationServiceInput::Add(automated_tempo()));
        // Nobody reads while a few thousand frames go by.
        std::thread::sleep(Duration::from_millis(500));
        assert_le!(s.receiver().len(), AutomationService::EVENT_CAPACITY);
        assert_eq!(
            s.receiver().capacity(),
            Some(AutomationService::EVENT_CAPACITY)
        );

        // Replies to inputs still get through once the client catches up.
        s.send_input(AutomationServiceInput::Delete(ParamUid(777)));
        let existed = wait_for(&s, |e| match e {
            AutomationServiceEvent::Deleted { existed, .. } => Some(existed),
            _ => None,
        });
        assert!(!existed);
        s.send_input(AutomationServiceInput::Quit);
        wait_for(&s, |e| match e {
            AutomationServiceEvent::Quit => Some(()),
            _ => None,
        });
    }
}
