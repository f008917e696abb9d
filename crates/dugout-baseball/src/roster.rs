// Roster slots and exclusive slot assignment.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::player::{Player, PlayerType};
use crate::position::{Position, LINEUP_POSITIONS};

/// Lineup slots in the order generators fill them: hardest to replace first.
pub const LINEUP_FILL_ORDER: [Position; 9] = [
    Position::Catcher,
    Position::ShortStop,
    Position::CenterField,
    Position::SecondBase,
    Position::ThirdBase,
    Position::RightField,
    Position::LeftField,
    Position::FirstBase,
    Position::DesignatedHitter,
];

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Identifies one roster slot. Indexed slots are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotId {
    Lineup(Position),
    Bench(usize),
    Rotation(usize),
    Bullpen(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Lineup,
    Bench,
    Rotation,
    Bullpen,
}

impl SlotId {
    pub fn kind(&self) -> SlotKind {
        match self {
            SlotId::Lineup(_) => SlotKind::Lineup,
            SlotId::Bench(_) => SlotKind::Bench,
            SlotId::Rotation(_) => SlotKind::Rotation,
            SlotId::Bullpen(_) => SlotKind::Bullpen,
        }
    }

    /// Whether `player` may occupy this slot.
    ///
    /// - Lineup: exact position; outfielders cover any outfield spot; DH takes
    ///   any batter.
    /// - Bench: any batter.
    /// - Rotation: starting pitchers.
    /// - Bullpen: relievers or starters.
    pub fn accepts(&self, player: &Player) -> bool {
        let pos = player.position;
        match self {
            SlotId::Lineup(Position::DesignatedHitter) | SlotId::Bench(_) => {
                player.player_type() == PlayerType::Batter
            }
            SlotId::Lineup(slot) if slot.is_outfield() => pos.is_outfield(),
            SlotId::Lineup(slot) => pos == *slot,
            SlotId::Rotation(_) => pos == Position::StartingPitcher,
            SlotId::Bullpen(_) => pos.is_pitcher(),
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Lineup(pos) => write!(f, "{pos}"),
            SlotId::Bench(i) => write!(f, "BN{}", i + 1),
            SlotId::Rotation(i) => write!(f, "SP{}", i + 1),
            SlotId::Bullpen(i) => write!(f, "RP{}", i + 1),
        }
    }
}

/// Counts for the indexed slot groups. The nine lineup slots are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterLayout {
    pub bench: usize,
    pub rotation: usize,
    pub bullpen: usize,
}

impl Default for RosterLayout {
    fn default() -> Self {
        RosterLayout {
            bench: 4,
            rotation: 5,
            bullpen: 8,
        }
    }
}

impl RosterLayout {
    pub fn capacity_of(&self, kind: SlotKind) -> usize {
        match kind {
            SlotKind::Lineup => LINEUP_POSITIONS.len(),
            SlotKind::Bench => self.bench,
            SlotKind::Rotation => self.rotation,
            SlotKind::Bullpen => self.bullpen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RosterState {
    Empty,
    PartiallyFilled,
    Filled,
}

#[derive(Debug, Clone)]
struct RosterSlot {
    id: SlotId,
    player: Option<Player>,
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// A team's slots. A player (by name) holds at most one slot.
#[derive(Debug, Clone)]
pub struct Roster {
    layout: RosterLayout,
    slots: Vec<RosterSlot>,
}

impl Default for Roster {
    fn default() -> Self {
        Roster::new(RosterLayout::default())
    }
}

impl Roster {
    /// An empty roster: lineup in display order, then bench, rotation, bullpen.
    pub fn new(layout: RosterLayout) -> Self {
        let lineup = LINEUP_POSITIONS.iter().map(|&p| SlotId::Lineup(p));
        let bench = (0..layout.bench).map(SlotId::Bench);
        let rotation = (0..layout.rotation).map(SlotId::Rotation);
        let bullpen = (0..layout.bullpen).map(SlotId::Bullpen);

        let slots = lineup
            .chain(bench)
            .chain(rotation)
            .chain(bullpen)
            .map(|id| RosterSlot { id, player: None })
            .collect();

        Roster { layout, slots }
    }

    pub fn layout(&self) -> RosterLayout {
        self.layout
    }

    /// Slot ids in generation order: lineup by scarcity, then rotation,
    /// bullpen, bench.
    pub fn fill_order(&self) -> Vec<SlotId> {
        let lineup = LINEUP_FILL_ORDER.iter().map(|&p| SlotId::Lineup(p));
        let rotation = (0..self.layout.rotation).map(SlotId::Rotation);
        let bullpen = (0..self.layout.bullpen).map(SlotId::Bullpen);
        let bench = (0..self.layout.bench).map(SlotId::Bench);
        lineup.chain(rotation).chain(bullpen).chain(bench).collect()
    }

    /// Put `player` in `slot`, vacating whatever slot they held before and
    /// displacing the current occupant.
    ///
    /// Returns `false` if the slot doesn't exist on this roster or the player
    /// isn't eligible for it.
    pub fn place(&mut self, slot: SlotId, player: Player) -> bool {
        let Some(index) = self.slots.iter().position(|s| s.id == slot) else {
            return false;
        };
        if !slot.accepts(&player) {
            return false;
        }
        self.remove_player(&player.name);
        self.slots[index].player = Some(player);
        true
    }

    pub fn add_to_lineup(&mut self, position: Position, player: Player) -> bool {
        self.place(SlotId::Lineup(position), player)
    }

    pub fn add_to_bench(&mut self, player: Player) -> bool {
        self.add_to_first_free(SlotKind::Bench, player)
    }

    pub fn add_to_rotation(&mut self, player: Player) -> bool {
        self.add_to_first_free(SlotKind::Rotation, player)
    }

    pub fn add_to_bullpen(&mut self, player: Player) -> bool {
        self.add_to_first_free(SlotKind::Bullpen, player)
    }

    fn add_to_first_free(&mut self, kind: SlotKind, player: Player) -> bool {
        if self.slot_of(&player.name).is_some_and(|s| s.kind() == kind) {
            return true;
        }
        let free = self
            .slots
            .iter()
            .find(|s| s.id.kind() == kind && s.player.is_none())
            .map(|s| s.id);
        match free {
            Some(id) => self.place(id, player),
            None => false,
        }
    }

    /// Take a player off the roster by name.
    pub fn remove_player(&mut self, name: &str) -> Option<Player> {
        self.slots
            .iter_mut()
            .find(|s| s.player.as_ref().is_some_and(|p| p.name == name))
            .and_then(|s| s.player.take())
    }

    pub fn remove_slot(&mut self, slot: SlotId) -> Option<Player> {
        self.slots
            .iter_mut()
            .find(|s| s.id == slot)
            .and_then(|s| s.player.take())
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.player = None;
        }
    }

    pub fn slot_of(&self, name: &str) -> Option<SlotId> {
        self.slots
            .iter()
            .find(|s| s.player.as_ref().is_some_and(|p| p.name == name))
            .map(|s| s.id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slot_of(name).is_some()
    }

    pub fn get(&self, slot: SlotId) -> Option<&Player> {
        self.slots
            .iter()
            .find(|s| s.id == slot)
            .and_then(|s| s.player.as_ref())
    }

    /// Filled slots in roster order.
    pub fn assignments(&self) -> Vec<(SlotId, &Player)> {
        self.slots
            .iter()
            .filter_map(|s| s.player.as_ref().map(|p| (s.id, p)))
            .collect()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.slots.iter().filter_map(|s| s.player.as_ref())
    }

    pub fn empty_slots(&self) -> Vec<SlotId> {
        self.slots
            .iter()
            .filter(|s| s.player.is_none())
            .map(|s| s.id)
            .collect()
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_some()).count()
    }

    pub fn filled_count_of(&self, kind: SlotKind) -> usize {
        self.slots
            .iter()
            .filter(|s| s.id.kind() == kind && s.player.is_some())
            .count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn state(&self) -> RosterState {
        match self.filled_count() {
            0 => RosterState::Empty,
            n if n == self.capacity() => RosterState::Filled,
            _ => RosterState::PartiallyFilled,
        }
    }

    // -----------------------------------------------------------------------
    // Export / import
    // -----------------------------------------------------------------------

    /// Flatten to names. Lineup slots keep their position; bench, rotation
    /// and bullpen list their occupants in slot order with gaps dropped, so
    /// `BN1` empty and `BN2` filled exports as a one-name bench.
    pub fn export(&self) -> RosterExport {
        let mut out = RosterExport::default();
        for slot in &self.slots {
            let name = slot.player.as_ref().map(|p| p.name.clone());
            match slot.id {
                SlotId::Lineup(pos) => {
                    out.lineup.insert(pos.display_str().to_string(), name);
                }
                SlotId::Bench(_) => out.bench.extend(name),
                SlotId::Rotation(_) => out.rotation.extend(name),
                SlotId::Bullpen(_) => out.bullpen.extend(name),
            }
        }
        out
    }

    /// Rebuild a roster from its exported form by looking names up in
    /// `pool`. Names missing from the pool, unknown lineup codes and
    /// players who no longer fit their slot are dropped.
    ///
    /// Indexed groups fill from the first slot, so a roster exported with
    /// gaps comes back compacted (`BN2` alone returns as `BN1`).
    pub fn import(data: &RosterExport, pool: &[Player], layout: RosterLayout) -> Self {
        let mut roster = Roster::new(layout);
        let find = |name: &str| pool.iter().find(|p| p.name == name).cloned();

        for (code, name) in &data.lineup {
            let Some(name) = name else { continue };
            let Some(pos) = Position::from_str_pos(code).filter(|p| p.is_lineup()) else {
                debug!("import: unknown lineup slot '{}'", code);
                continue;
            };
            match find(name) {
                Some(player) => {
                    if !roster.add_to_lineup(pos, player) {
                        debug!("import: {} cannot play {}", name, pos);
                    }
                }
                None => debug!("import: '{}' not in player pool", name),
            }
        }

        let groups: [(&Vec<String>, SlotKind); 3] = [
            (&data.bench, SlotKind::Bench),
            (&data.rotation, SlotKind::Rotation),
            (&data.bullpen, SlotKind::Bullpen),
        ];
        for (names, kind) in groups {
            for name in names {
                let Some(player) = find(name) else {
                    debug!("import: '{}' not in player pool", name);
                    continue;
                };
                if !roster.add_to_first_free(kind, player) {
                    debug!("import: no {:?} slot for {}", kind, name);
                }
            }
        }

        roster
    }
}

/// Plain serializable roster keyed by player name.
///
/// Indexed groups list occupied slots in order; empty indexed slots are not
/// represented, and [`Roster::import`] compacts them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterExport {
    pub lineup: BTreeMap<String, Option<String>>,
    pub bench: Vec<String>,
    pub rotation: Vec<String>,
    pub bullpen: Vec<String>,
}
