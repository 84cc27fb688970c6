use crate::*;

impl RunState {
    pub fn active_group(&self) -> Result<&Group, RunError> {
        let number = self.active_group.ok_or(RunError::NoActiveGroup)?;
        self.occupied_group(number).ok_or(RunError::GroupNotFound(number))
    }

    /// Starts defending against `number`, replacing the alert count with the
    /// alerts that group's size generates.
    pub fn begin_defense(&mut self, number: u32, events: &mut EventBus) -> Result<i64, RunError> {
        let group = self
            .occupied_group(number)
            .ok_or(RunError::GroupNotFound(number))?;
        let runners = group.members.clone();
        let alerts = alerts_generated(runners.len());
        self.active_group = Some(number);
        self.cursor = None;
        self.alerts = alerts;
        events.push(RunEvent::DefenseBegun {
            group: number,
            runners,
            alerts,
        });
        Ok(alerts)
    }

    pub fn add_alerts(&mut self, delta: i64, events: &mut EventBus) -> i64 {
        self.alerts = self.alerts.saturating_add(delta);
        events.push(RunEvent::AlertsAdded {
            delta,
            total: self.alerts,
        });
        self.alerts
    }
}
