//! Player input routed to player-controlled combatants.

use combat_core::{AgentId, CommandOutcome, MovementInput};

use super::{CombatWorld, player_in};
use crate::error::Result;

impl CombatWorld {
    pub fn player_attack(&mut self, player: AgentId) -> Result<CommandOutcome> {
        let before = self.observe(player);
        let outcome =
            player_in(&mut self.registry, player)?.attack_combo(&mut self.backends.services());
        self.record_changes(player, before);
        Ok(outcome)
    }

    pub fn player_dodge(&mut self, player: AgentId) -> Result<CommandOutcome> {
        let before = self.observe(player);
        let outcome = player_in(&mut self.registry, player)?.dodge(&mut self.backends.services());
        self.record_changes(player, before);
        Ok(outcome)
    }

    /// Sets the movement input that picks the direction of the next dodge.
    pub fn player_set_movement(&mut self, player: AgentId, movement: MovementInput) -> Result<()> {
        player_in(&mut self.registry, player)?.set_movement(movement);
        Ok(())
    }

    /// Opens the combo window of the player's swing in flight.
    pub fn player_open_combo_window(&mut self, player: AgentId) -> Result<()> {
        player_in(&mut self.registry, player)?.open_combo_window();
        Ok(())
    }
}
