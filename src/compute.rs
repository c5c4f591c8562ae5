/// Pure session-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `Session` (and, where needed, an RNG handle) and returns a brand-new
/// `Session`.  Side effects are limited to the injected RNG and `tracing`
/// diagnostics.  All operations are no-ops unless the session is Active,
/// so a stale driver tick can never mutate freshly-reset state.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::entities::{
    Badge, Bounds, Difficulty, Enemy, EnemyKind, Explosion, Phase, Session, Shot, ShotKind,
    Summary,
};

// ── Fixed gameplay constants ──────────────────────────────────────────────────

/// Session length in seconds.
pub const SESSION_SECONDS: u32 = 180;
pub const MAX_HEALTH: u32 = 100;
/// Health lost per enemy that reaches the bottom.
pub const BOTTOM_PENALTY: u32 = 15;
pub const POINTS_CORRECT: u32 = 100;
pub const POINTS_WRONG: u32 = 20;

/// Player movement per simulation tick, in percent of play-area width.
pub const PLAYER_SPEED: f32 = 2.0;
/// Shot rise per simulation tick, in pixels.
pub const SHOT_SPEED: f32 = 8.0;

pub const SHOT_WIDTH: f32 = 8.0;
pub const SHOT_HEIGHT: f32 = 15.0;
pub const ENEMY_WIDTH: f32 = 45.0;
pub const ENEMY_HEIGHT: f32 = 45.0;
pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 40.0;
/// Gap between the player's bottom edge and the play-area floor.
pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;
/// Enemies spawn this far above the visible area.
pub const SPAWN_Y: f32 = -60.0;

/// Impact flashes live ~300 ms at 60 simulation ticks per second.
pub const EXPLOSION_TICKS: u32 = 18;

// ── Difficulty tables ─────────────────────────────────────────────────────────

/// Enemy fall speed in pixels per simulation tick.
pub fn enemy_speed(difficulty: &Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 0.5,
        Difficulty::Medium => 1.0,
        Difficulty::Hard => 1.5,
    }
}

/// Period of the spawn driver.
pub fn spawn_interval(difficulty: &Difficulty) -> Duration {
    match difficulty {
        Difficulty::Easy => Duration::from_millis(7000),
        Difficulty::Medium => Duration::from_millis(5000),
        Difficulty::Hard => Duration::from_millis(3000),
    }
}

// ── Badge selection ───────────────────────────────────────────────────────────

/// Accuracy as a percentage; 0 when no hits were recorded.
pub fn accuracy_percent(correct: u32, wrong: u32) -> f32 {
    let total = correct + wrong;
    if total == 0 {
        0.0
    } else {
        correct as f32 / total as f32 * 100.0
    }
}

/// Joint score/accuracy thresholds, checked in priority order.
pub fn badge_for(score: u32, accuracy: f32) -> Badge {
    if score >= 3000 && accuracy >= 80.0 {
        Badge::Legend
    } else if score >= 1000 && accuracy >= 60.0 {
        Badge::Hero
    } else {
        Badge::Novice
    }
}

// ── Session lifecycle ─────────────────────────────────────────────────────────

/// Build a fresh Active session for a chosen difficulty and play area.
pub fn start_session(difficulty: Difficulty, bounds: Bounds) -> Session {
    info!(?difficulty, ?bounds, "starting session");
    Session {
        phase: Phase::Active,
        score: 0,
        time_left: SESSION_SECONDS,
        health: MAX_HEALTH,
        correct_hits: 0,
        wrong_hits: 0,
        selected_shot: ShotKind::Lubricant,
        difficulty,
        player_x: 50.0,
        moving_left: false,
        moving_right: false,
        shots: Vec::new(),
        enemies: Vec::new(),
        explosions: Vec::new(),
        next_id: 0,
        bounds,
        summary: None,
    }
}

/// End the session and compute the final summary.  Idempotent: calling it
/// on an already-Ended session returns that session unchanged.
pub fn end_session(state: &Session) -> Session {
    if state.phase == Phase::Ended {
        return state.clone();
    }
    let mut next = state.clone();
    let accuracy = accuracy_percent(next.correct_hits, next.wrong_hits);
    let badge = badge_for(next.score, accuracy);
    info!(
        score = next.score,
        correct = next.correct_hits,
        wrong = next.wrong_hits,
        accuracy = accuracy as f64,
        badge = badge.label(),
        "session ended"
    );
    next.summary = Some(Summary {
        score: next.score,
        correct: next.correct_hits,
        wrong: next.wrong_hits,
        accuracy,
        badge,
    });
    next.moving_left = false;
    next.moving_right = false;
    next.phase = Phase::Ended;
    next
}

/// Discard all live entities and restore initial values, returning to Idle.
/// Normally called from Ended; calling it on a still-Active session is
/// permitted (the caller must also drop its drivers) and logged.
pub fn reset_session(state: &Session) -> Session {
    if state.phase == Phase::Active {
        warn!("resetting a session that was still active");
    }
    Session {
        phase: Phase::Idle,
        score: 0,
        time_left: SESSION_SECONDS,
        health: MAX_HEALTH,
        correct_hits: 0,
        wrong_hits: 0,
        selected_shot: ShotKind::Lubricant,
        difficulty: state.difficulty,
        player_x: 50.0,
        moving_left: false,
        moving_right: false,
        shots: Vec::new(),
        enemies: Vec::new(),
        explosions: Vec::new(),
        next_id: 0,
        bounds: state.bounds,
        summary: None,
    }
}

// ── Input-driven transitions (pure) ───────────────────────────────────────────

/// Raise or lower the "move left" hold flag.  Raising is only allowed while
/// the session is Active; lowering is always honored.
pub fn set_move_left(state: &Session, held: bool) -> Session {
    let mut next = state.clone();
    next.moving_left = held && state.phase == Phase::Active;
    next
}

pub fn set_move_right(state: &Session, held: bool) -> Session {
    let mut next = state.clone();
    next.moving_right = held && state.phase == Phase::Active;
    next
}

/// Change the currently selected treatment.
pub fn select_shot(state: &Session, kind: ShotKind) -> Session {
    if state.phase != Phase::Active {
        return state.clone();
    }
    let mut next = state.clone();
    next.selected_shot = kind;
    next
}

/// Fire one shot of the selected kind, centered above the player.
pub fn fire_shot(state: &Session) -> Session {
    if state.phase != Phase::Active {
        return state.clone();
    }
    if state.bounds.width <= 0.0 {
        warn!("cannot fire: play-area width is degenerate");
        return state.clone();
    }
    let mut next = state.clone();
    let center = next.player_x / 100.0 * next.bounds.width;
    let id = next.next_id;
    next.next_id += 1;
    next.shots.push(Shot {
        id,
        kind: next.selected_shot,
        x: center - SHOT_WIDTH / 2.0,
        y: player_top(&next.bounds) - SHOT_HEIGHT,
    });
    next
}

/// Vertical position of the player's top edge.
pub fn player_top(bounds: &Bounds) -> f32 {
    bounds.height - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN
}

// ── Spawner ───────────────────────────────────────────────────────────────────

/// Create exactly one enemy: uniformly random kind, uniformly random
/// horizontal position within `[0, width − enemy width)`, just above the
/// visible area.  All randomness comes through `rng` so callers control
/// determinism.
pub fn spawn_enemy(state: &Session, rng: &mut impl Rng) -> Session {
    if state.phase != Phase::Active {
        return state.clone();
    }
    let span = state.bounds.width - ENEMY_WIDTH;
    if span <= 0.0 {
        warn!(width = state.bounds.width as f64, "cannot spawn: play area too narrow");
        return state.clone();
    }
    let mut next = state.clone();
    let kind = EnemyKind::ALL[rng.gen_range(0..EnemyKind::ALL.len())];
    let x = rng.gen_range(0.0..span);
    let id = next.next_id;
    next.next_id += 1;
    debug!(id, ?kind, x = x as f64, "spawning enemy");
    next.enemies.push(Enemy {
        id,
        kind,
        x,
        y: SPAWN_Y,
    });
    next
}

// ── Timer driver ──────────────────────────────────────────────────────────────

/// One-second countdown step.  Reaching zero triggers the end transition.
pub fn second_tick(state: &Session) -> Session {
    if state.phase != Phase::Active {
        return state.clone();
    }
    let mut next = state.clone();
    next.time_left = next.time_left.saturating_sub(1);
    if next.time_left == 0 {
        return end_session(&next);
    }
    next
}

// ── Motion & collision step (~60 Hz) ──────────────────────────────────────────

/// Advance the simulation by one tick: held player movement, shot and enemy
/// motion, bottom-boundary penalties, shot↔enemy collision resolution, and
/// impact-flash decay.
pub fn tick(state: &Session) -> Session {
    if state.phase != Phase::Active {
        return state.clone();
    }
    let mut next = state.clone();

    // 1. Held movement
    if next.moving_left {
        move_player(&mut next, -PLAYER_SPEED);
    }
    if next.moving_right {
        move_player(&mut next, PLAYER_SPEED);
    }

    // 2. Shots rise; cull once the trailing edge clears the top
    for shot in &mut next.shots {
        shot.y -= SHOT_SPEED;
    }
    next.shots.retain(|s| s.y >= -SHOT_HEIGHT);

    // 3. Enemies fall; leading edge past the floor costs health
    let speed = enemy_speed(&next.difficulty);
    for enemy in &mut next.enemies {
        enemy.y += speed;
    }
    let floor = next.bounds.height;
    if floor > 0.0 {
        let mut landed = 0u32;
        next.enemies.retain(|e| {
            if e.y + ENEMY_HEIGHT > floor {
                debug!(id = e.id, kind = e.kind.label(), "enemy reached the bottom");
                landed += 1;
                false
            } else {
                true
            }
        });
        if landed > 0 {
            next.health = next.health.saturating_sub(landed * BOTTOM_PENALTY);
            if next.health == 0 {
                return end_session(&next);
            }
        }
    }

    // 4. Collision resolution — at most one enemy per shot
    resolve_collisions(&mut next);

    // 5. Impact flashes decay
    for ex in &mut next.explosions {
        ex.ticks_left = ex.ticks_left.saturating_sub(1);
    }
    next.explosions.retain(|ex| ex.ticks_left > 0);

    next
}

/// Shift the player by `delta` percent, keeping the rendered half-width
/// inside the play area.  Degenerate width aborts the move for this tick.
fn move_player(next: &mut Session, delta: f32) {
    let w = next.bounds.width;
    if w <= 0.0 {
        warn!("cannot move player: play-area width is degenerate");
        return;
    }
    let half = PLAYER_WIDTH / w * 50.0;
    // min-then-max mirrors the clamp-from-both-sides order so a play area
    // narrower than the player still yields a stable position.
    next.player_x = (next.player_x + delta).min(100.0 - half).max(half);
}

#[derive(Clone, Copy)]
struct Rect {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

fn shot_rect(shot: &Shot) -> Rect {
    Rect {
        left: shot.x,
        top: shot.y,
        right: shot.x + SHOT_WIDTH,
        bottom: shot.y + SHOT_HEIGHT,
    }
}

fn enemy_rect(enemy: &Enemy) -> Rect {
    Rect {
        left: enemy.x,
        top: enemy.y,
        right: enemy.x + ENEMY_WIDTH,
        bottom: enemy.y + ENEMY_HEIGHT,
    }
}

/// Axis-aligned bounding-box test: rectangles intersect iff neither is
/// entirely to one side of the other on either axis.
fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.right < b.left || a.left > b.right || a.bottom < b.top || a.top > b.bottom)
}

/// For every live shot, resolve against the first still-live overlapping
/// enemy.  A matching kind scores; a mismatch penalizes.  Both entities are
/// removed and a flash is registered at the enemy's center.  Exactly one
/// enemy is destroyed per shot; which one, when several overlap, follows
/// iteration order and is not part of the contract.
fn resolve_collisions(next: &mut Session) {
    let mut spent_shots: Vec<usize> = Vec::new();
    let mut destroyed: Vec<usize> = Vec::new();

    for (si, shot) in next.shots.iter().enumerate() {
        let srect = shot_rect(shot);
        for (ei, enemy) in next.enemies.iter().enumerate() {
            if destroyed.contains(&ei) {
                continue;
            }
            if !overlaps(&srect, &enemy_rect(enemy)) {
                continue;
            }
            if shot.kind == enemy.kind.correct_shot() {
                next.score += POINTS_CORRECT;
                next.correct_hits += 1;
                debug!(shot = shot.kind.label(), enemy = enemy.kind.label(), "correct hit");
            } else {
                next.score = next.score.saturating_sub(POINTS_WRONG);
                next.wrong_hits += 1;
                debug!(shot = shot.kind.label(), enemy = enemy.kind.label(), "wrong hit");
            }
            next.explosions.push(Explosion {
                x: enemy.x + ENEMY_WIDTH / 2.0,
                y: enemy.y + ENEMY_HEIGHT / 2.0,
                kind: enemy.kind,
                ticks_left: EXPLOSION_TICKS,
            });
            spent_shots.push(si);
            destroyed.push(ei);
            break;
        }
    }

    if spent_shots.is_empty() {
        return;
    }

    next.shots = next
        .shots
        .iter()
        .enumerate()
        .filter(|(i, _)| !spent_shots.contains(i))
        .map(|(_, s)| s.clone())
        .collect();
    next.enemies = next
        .enemies
        .iter()
        .enumerate()
        .filter(|(i, _)| !destroyed.contains(i))
        .map(|(_, e)| e.clone())
        .collect();
}
