// Copyright (c) 2024 Mike Tsao

use super::{
    AutomationError, AutomationParameter, AutomationSink, Notification, ParameterChanges,
    ParameterDraft, ParameterKind,
};
use crate::{
    types::{Normal, ParamUid, ParamUidFactory, Tempo},
    util::{AutomationSettings, CrossbeamChannel},
};
use crossbeam::channel::Receiver;
use std::sync::Arc;

/// Owns the list of automatable parameters and is the only thing that changes
/// it.
///
/// The list is never edited in place. Every mutation builds a new list and
/// swaps it in, so a snapshot from [AutomationEngine::parameters()] stays
/// internally consistent no matter what happens afterward.
#[derive(Debug)]
pub struct AutomationEngine {
    parameters: Arc<[AutomationParameter]>,
    uid_factory: ParamUidFactory,
    sink: Box<dyn AutomationSink>,
    notifications: CrossbeamChannel<Notification>,
    notifications_enabled: bool,
}
impl AutomationEngine {
    /// Creates an empty engine that drives `sink`.
    pub fn new_with(sink: Box<dyn AutomationSink>) -> Self {
        Self::new_with_settings(sink, &AutomationSettings::default())
    }

    #[allow(missing_docs)]
    pub fn new_with_settings(sink: Box<dyn AutomationSink>, settings: &AutomationSettings) -> Self {
        Self {
            parameters: Arc::from(Vec::default()),
            uid_factory: ParamUidFactory::default(),
            sink,
            notifications: CrossbeamChannel::default(),
            notifications_enabled: settings.notifications_enabled(),
        }
    }

    /// Validates `draft` and, if it passes, appends it to the list under a
    /// freshly minted uid. Any uid already in the draft is ignored.
    ///
    /// Emits one notification either way.
    pub fn add(&mut self, draft: ParameterDraft) -> Result<ParamUid, AutomationError> {
        let uid = self.uid_factory.mint_next();
        let draft = ParameterDraft {
            uid: Some(uid),
            ..draft
        };
        match AutomationParameter::try_from(draft) {
            Ok(param) => {
                log::debug!("added parameter {uid} ({}, {})", param.name, param.kind);
                self.notify(Notification::added(&param.name));
                self.replace_parameters(|params| params.push(param));
                Ok(uid)
            }
            Err(e) => {
                log::debug!("rejected new parameter: {e}");
                self.notify(Notification::add_failed(&e));
                Err(e.into())
            }
        }
    }

    /// Applies `changes` to the parameter with this uid. The merged result is
    /// validated as a whole, and if it fails, the stored parameter is left
    /// exactly as it was.
    ///
    /// An unknown uid is an error but doesn't produce a notification.
    pub fn update(
        &mut self,
        uid: ParamUid,
        changes: &ParameterChanges,
    ) -> Result<(), AutomationError> {
        let Some(index) = self.index_of(uid) else {
            log::debug!("update: no parameter {uid}");
            return Err(AutomationError::NotFound(uid));
        };
        let draft = changes.merged_onto(&self.parameters[index]);
        match AutomationParameter::try_from(draft) {
            Ok(param) => {
                log::debug!("updated parameter {uid}");
                self.replace_parameters(|params| params[index] = param);
                self.notify(Notification::updated());
                Ok(())
            }
            Err(e) => {
                log::debug!("rejected update to parameter {uid}: {e}");
                self.notify(Notification::update_failed(&e));
                Err(e.into())
            }
        }
    }

    /// Removes the parameter with this uid. Returns false (and does nothing
    /// else) if there isn't one.
    pub fn delete(&mut self, uid: ParamUid) -> bool {
        let Some(index) = self.index_of(uid) else {
            log::debug!("delete: no parameter {uid}");
            return false;
        };
        self.replace_parameters(|params| {
            params.remove(index);
        });
        log::debug!("deleted parameter {uid}");
        self.notify(Notification::deleted());
        true
    }

    /// Turns automation on or off for one parameter. This isn't validated and
    /// doesn't notify. Returns false if there's no such parameter.
    pub fn toggle_automation(&mut self, uid: ParamUid, enabled: bool) -> bool {
        let Some(index) = self.index_of(uid) else {
            log::debug!("toggle: no parameter {uid}");
            return false;
        };
        self.replace_parameters(|params| params[index].automation_enabled = enabled);
        log::debug!("automation for parameter {uid} is now {enabled}");
        true
    }

    /// A consistent, immutable view of every parameter, in insertion order.
    /// Cheap to take and safe to hand to another thread.
    pub fn parameters(&self) -> Arc<[AutomationParameter]> {
        Arc::clone(&self.parameters)
    }

    #[allow(missing_docs)]
    pub fn parameter(&self, uid: ParamUid) -> Option<&AutomationParameter> {
        self.parameters.iter().find(|p| p.uid == uid)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// True if at least one parameter has automation enabled and a config.
    pub fn has_active_automation(&self) -> bool {
        self.parameters.iter().any(|p| p.is_actively_automated())
    }

    /// Where notifications arrive. Receivers can be cloned freely.
    pub fn notification_receiver(&self) -> &Receiver<Notification> {
        &self.notifications.receiver
    }

    /// Returns every notification that hasn't been received yet.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Sends `value` to the sink according to `param`'s kind.
    pub(crate) fn deliver(
        &mut self,
        param: &AutomationParameter,
        value: f64,
    ) -> Result<(), AutomationError> {
        let result = match param.kind {
            ParameterKind::Tempo => self.sink.set_tempo(Tempo(value)),
            ParameterKind::BassIntensity => self.sink.set_bass_intensity(Normal::new(value)),
            // Nothing consumes these yet.
            ParameterKind::VisualizerProperty => Ok(()),
        };
        result.map_err(|source| AutomationError::SinkDelivery {
            uid: param.uid,
            kind: param.kind,
            value,
            source,
        })
    }

    /// Stores new values for a batch of parameters in a single swap. Uids that
    /// have disappeared are skipped.
    pub(crate) fn commit_values(&mut self, values: &[(ParamUid, f64)]) {
        if values.is_empty() {
            return;
        }
        let updated: Vec<_> = self
            .parameters
            .iter()
            .map(
                |param| match values.iter().find(|(uid, _)| *uid == param.uid) {
                    Some((_, value)) => param.with_value(*value),
                    None => param.clone(),
                },
            )
            .collect();
        self.parameters = updated.into();
    }

    fn index_of(&self, uid: ParamUid) -> Option<usize> {
        self.parameters.iter().position(|p| p.uid == uid)
    }

    fn replace_parameters(&mut self, f: impl FnOnce(&mut Vec<AutomationParameter>)) {
        let mut params = self.parameters.to_vec();
        f(&mut params);
        self.parameters = params.into();
    }

    fn notify(&self, notification: Notification) {
        if !self.notifications_enabled {
            return;
        }
        if let Err(e) = self.notifications.sender.try_send(notification) {
            log::warn!("dropped a notification: {e}");
        }
    }
}
