//! Scene gate — hides vacationing crew while a crew-assignment screen is open.
//!
//! The stock assignment widget lists every `Available` crew member. Under
//! hard-lock the gate flips vacationing crew to [`RosterStatus::Vacation`]
//! on entering the screen so the widget skips them, and flips every
//! `Vacation` crew member back to `Available` on leaving the screen or on
//! any scene load.
//!
//! A scene load also arms a one-shot release consumed by the next
//! [`SceneGate::tick`], so crew are restored even if the host never delivered
//! the "screen closed" event.

use serde::{Deserialize, Serialize};

use crate::ledger::VacationLedger;
use crate::roster::{CrewKind, RosterHost, RosterStatus};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SuppressionState {
    #[default]
    Normal,
    Suppressed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneGate {
    state: SuppressionState,
    release_pending: bool,
}

impl SceneGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SuppressionState {
        self.state
    }

    pub fn release_pending(&self) -> bool {
        self.release_pending
    }

    /// A crew-assignment screen opened. Returns the number of crew hidden.
    pub fn enter_crew_screen<H: RosterHost + ?Sized>(
        &mut self,
        host: &mut H,
        ledger: &VacationLedger,
        settings: &Settings,
        now: f64,
    ) -> usize {
        self.state = SuppressionState::Suppressed;
        let hidden = hide_vacationing(host, ledger, settings, now);
        log::info!("Crew screen opened, {} vacationing crew hidden", hidden);
        hidden
    }

    /// The crew-assignment screen closed. Returns the number restored.
    pub fn leave_crew_screen<H: RosterHost + ?Sized>(&mut self, host: &mut H) -> usize {
        self.state = SuppressionState::Normal;
        let restored = restore_all(host);
        log::info!("Crew screen closed, {} crew restored", restored);
        restored
    }

    /// Any scene finished loading.
    pub fn on_scene_loaded<H: RosterHost + ?Sized>(&mut self, host: &mut H) -> usize {
        self.state = SuppressionState::Normal;
        self.release_pending = true;
        restore_all(host)
    }

    /// Per-frame update. Consumes a pending release.
    pub fn tick<H: RosterHost + ?Sized>(&mut self, host: &mut H) -> usize {
        if !self.release_pending {
            return 0;
        }
        self.release_pending = false;
        if self.state == SuppressionState::Suppressed {
            return 0;
        }
        let restored = restore_all(host);
        if restored > 0 {
            log::debug!("Deferred release restored {} crew", restored);
        }
        restored
    }

    /// Re-apply the policy while suppressed: restores crew whose vacation
    /// ended or, with hard-lock now off, everyone; hides newly vacationing
    /// crew. No-op in [`SuppressionState::Normal`].
    pub fn refresh<H: RosterHost + ?Sized>(
        &mut self,
        host: &mut H,
        ledger: &VacationLedger,
        settings: &Settings,
        now: f64,
    ) {
        if self.state != SuppressionState::Suppressed {
            return;
        }
        for member in host.members() {
            let hide = settings.vacation_hardlock && ledger.is_on_vacation(&member.name, now);
            if member.status == RosterStatus::Vacation && !hide {
                host.set_status(&member.name, RosterStatus::Available);
            }
        }
        hide_vacationing(host, ledger, settings, now);
    }
}

fn hide_vacationing<H: RosterHost + ?Sized>(
    host: &mut H,
    ledger: &VacationLedger,
    settings: &Settings,
    now: f64,
) -> usize {
    if !settings.vacation_hardlock {
        return 0;
    }
    let mut hidden = 0;
    for member in host.members() {
        if member.kind == CrewKind::Crew
            && member.status == RosterStatus::Available
            && ledger.is_on_vacation(&member.name, now)
            && host.set_status(&member.name, RosterStatus::Vacation)
        {
            hidden += 1;
        }
    }
    hidden
}

/// Restore every crew member carrying the vacation override, tracked or not.
fn restore_all<H: RosterHost + ?Sized>(host: &mut H) -> usize {
    let mut restored = 0;
    for member in host.members() {
        if member.status == RosterStatus::Vacation
            && host.set_status(&member.name, RosterStatus::Available)
        {
            restored += 1;
        }
    }
    restored
}
