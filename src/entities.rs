/// All session data types — pure data, no simulation logic.

// ── Catalogs ──────────────────────────────────────────────────────────────────

/// The five treatment categories the player can fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotKind {
    Lubricant,
    Antihistamine,
    Decongestant,
    Corticosteroid,
    Antiglaucoma,
}

impl ShotKind {
    pub const ALL: [ShotKind; 5] = [
        ShotKind::Lubricant,
        ShotKind::Antihistamine,
        ShotKind::Decongestant,
        ShotKind::Corticosteroid,
        ShotKind::Antiglaucoma,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShotKind::Lubricant => "Lubricant",
            ShotKind::Antihistamine => "Antihistamine",
            ShotKind::Decongestant => "Decongestant",
            ShotKind::Corticosteroid => "Corticosteroid",
            ShotKind::Antiglaucoma => "Antiglaucoma",
        }
    }
}

/// The five eye conditions that fall from the top of the play area.
/// Each one is treated by exactly one `ShotKind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    DryEye,
    Conjunctivitis,
    SoreEye,
    RedEye,
    Glaucoma,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::DryEye,
        EnemyKind::Conjunctivitis,
        EnemyKind::SoreEye,
        EnemyKind::RedEye,
        EnemyKind::Glaucoma,
    ];

    /// Short label shown on the falling entity.
    pub fn label(&self) -> &'static str {
        match self {
            EnemyKind::DryEye => "Dry eye",
            EnemyKind::Conjunctivitis => "Conjunctivitis",
            EnemyKind::SoreEye => "Sore eye",
            EnemyKind::RedEye => "Rhinitis",
            EnemyKind::Glaucoma => "Glaucoma",
        }
    }

    /// The one treatment that scores against this condition.
    pub fn correct_shot(&self) -> ShotKind {
        match self {
            EnemyKind::DryEye => ShotKind::Lubricant,
            EnemyKind::Conjunctivitis => ShotKind::Antihistamine,
            EnemyKind::SoreEye => ShotKind::Decongestant,
            EnemyKind::RedEye => ShotKind::Corticosteroid,
            EnemyKind::Glaucoma => ShotKind::Antiglaucoma,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Session state machine: Idle (menu) → Active → Ended → back to Idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Ended,
}

/// Award tier computed from final score and accuracy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Badge {
    Legend,
    Hero,
    Novice,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::Legend => "Legend",
            Badge::Hero => "Hero",
            Badge::Novice => "Novice",
        }
    }
}

// ── Play area ─────────────────────────────────────────────────────────────────

/// Logical play-area size in pixels.  The renderer decides how pixels map
/// onto terminal cells; the simulation never sees cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

// ── Live entities ─────────────────────────────────────────────────────────────

/// A fired treatment.  `x`/`y` is the top-left corner of its 8×15 rect;
/// `x` is fixed at creation, `y` decreases every simulation tick.
#[derive(Clone, Debug)]
pub struct Shot {
    pub id: u32,
    pub kind: ShotKind,
    pub x: f32,
    pub y: f32,
}

/// A falling condition.  `x`/`y` is the top-left corner of its 45×45 rect;
/// `y` increases every simulation tick at the difficulty speed.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
}

/// Transient impact flash at the point where an enemy was destroyed.
/// Purely cosmetic; expires after a fixed number of ticks.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    /// Enemy kind at the impact, used only for coloring.
    pub kind: EnemyKind,
    pub ticks_left: u32,
}

// ── End-of-session summary ────────────────────────────────────────────────────

/// Read-only results exposed once the session has ended.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub score: u32,
    pub correct: u32,
    pub wrong: u32,
    /// Percentage in [0, 100]; 0 when no hits were recorded.
    pub accuracy: f32,
    pub badge: Badge,
}

// ── Master session state ──────────────────────────────────────────────────────

/// The entire session state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct Session {
    pub phase: Phase,
    pub score: u32,
    /// Seconds remaining, counting down from the session length.
    pub time_left: u32,
    /// Health pool, drained by enemies that reach the bottom.
    pub health: u32,
    pub correct_hits: u32,
    pub wrong_hits: u32,
    pub selected_shot: ShotKind,
    pub difficulty: Difficulty,
    /// Player center as a percentage of the play-area width.
    pub player_x: f32,
    /// Hold flags driven by the input layer; consumed each tick.
    pub moving_left: bool,
    pub moving_right: bool,
    pub shots: Vec<Shot>,
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    /// Next entity id to hand out.
    pub next_id: u32,
    pub bounds: Bounds,
    /// Populated exactly once, by the end transition.
    pub summary: Option<Summary>,
}
