use eyedrop_invaders::compute::*;
use eyedrop_invaders::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_session() -> Session {
    start_session(
        Difficulty::Medium,
        Bounds {
            width: 800.0,
            height: 600.0,
        },
    )
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn shot(kind: ShotKind, x: f32, y: f32) -> Shot {
    Shot { id: 900, kind, x, y }
}

fn enemy(kind: EnemyKind, x: f32, y: f32) -> Enemy {
    Enemy { id: 901, kind, x, y }
}

// ── start_session ─────────────────────────────────────────────────────────────

#[test]
fn start_session_initial_values() {
    let s = make_session();
    assert_eq!(s.phase, Phase::Active);
    assert_eq!(s.score, 0);
    assert_eq!(s.time_left, SESSION_SECONDS);
    assert_eq!(s.health, MAX_HEALTH);
    assert_eq!(s.correct_hits, 0);
    assert_eq!(s.wrong_hits, 0);
    assert_eq!(s.selected_shot, ShotKind::Lubricant);
    assert_eq!(s.player_x, 50.0);
    assert!(s.shots.is_empty());
    assert!(s.enemies.is_empty());
    assert!(s.explosions.is_empty());
    assert!(s.summary.is_none());
}

#[test]
fn start_session_keeps_difficulty_and_bounds() {
    let s = start_session(
        Difficulty::Hard,
        Bounds {
            width: 500.0,
            height: 400.0,
        },
    );
    assert_eq!(s.difficulty, Difficulty::Hard);
    assert_eq!(s.bounds.width, 500.0);
    assert_eq!(s.bounds.height, 400.0);
}

// ── player movement (hold flags, applied by tick) ─────────────────────────────

#[test]
fn held_left_moves_player_each_tick() {
    let mut s = make_session();
    s.moving_left = true;
    let s2 = tick(&s);
    assert_eq!(s2.player_x, 50.0 - PLAYER_SPEED);
}

#[test]
fn held_right_moves_player_each_tick() {
    let mut s = make_session();
    s.moving_right = true;
    let s2 = tick(&s);
    assert_eq!(s2.player_x, 50.0 + PLAYER_SPEED);
}

#[test]
fn player_clamps_at_left_edge() {
    // half-width percent = 50 px / 800 px * 50 = 3.125
    let mut s = make_session();
    s.player_x = 4.0;
    s.moving_left = true;
    let s2 = tick(&s);
    assert_eq!(s2.player_x, 3.125);
}

#[test]
fn player_clamps_at_right_edge() {
    let mut s = make_session();
    s.player_x = 96.0;
    s.moving_right = true;
    let s2 = tick(&s);
    assert_eq!(s2.player_x, 100.0 - 3.125);
}

#[test]
fn player_stays_clamped_over_long_hold() {
    let mut s = make_session();
    s.moving_left = true;
    for _ in 0..200 {
        s = tick(&s);
    }
    assert_eq!(s.player_x, 3.125);
}

#[test]
fn degenerate_width_aborts_move() {
    let mut s = make_session();
    s.bounds.width = 0.0;
    s.moving_left = true;
    let s2 = tick(&s);
    assert_eq!(s2.player_x, 50.0);
}

#[test]
fn hold_flag_cannot_be_raised_after_end() {
    let s = end_session(&make_session());
    let s2 = set_move_left(&s, true);
    assert!(!s2.moving_left);
    // lowering is always honored
    let s3 = set_move_left(&s, false);
    assert!(!s3.moving_left);
}

// ── shot motion ───────────────────────────────────────────────────────────────

#[test]
fn shots_rise_at_fixed_speed() {
    let mut s = make_session();
    s.shots.push(shot(ShotKind::Lubricant, 400.0, 100.0));
    let s2 = tick(&s);
    assert_eq!(s2.shots.len(), 1);
    assert_eq!(s2.shots[0].y, 100.0 - SHOT_SPEED);
}

#[test]
fn shot_culled_once_trailing_edge_clears_top() {
    let mut s = make_session();
    // y = -8 → -16, past the -15 trailing edge → culled
    s.shots.push(shot(ShotKind::Lubricant, 400.0, -8.0));
    // y = 0 → -8, still visible in part → kept
    s.shots.push(shot(ShotKind::Lubricant, 200.0, 0.0));
    let s2 = tick(&s);
    assert_eq!(s2.shots.len(), 1);
    assert_eq!(s2.shots[0].x, 200.0);
}

// ── enemy motion & bottom penalty ─────────────────────────────────────────────

#[test]
fn enemies_fall_at_difficulty_speed() {
    for (difficulty, speed) in [
        (Difficulty::Easy, 0.5),
        (Difficulty::Medium, 1.0),
        (Difficulty::Hard, 1.5),
    ] {
        let mut s = start_session(
            difficulty,
            Bounds {
                width: 800.0,
                height: 600.0,
            },
        );
        s.enemies.push(enemy(EnemyKind::DryEye, 100.0, 10.0));
        let s2 = tick(&s);
        assert_eq!(s2.enemies[0].y, 10.0 + speed);
    }
}

#[test]
fn enemy_reaching_bottom_costs_exactly_fifteen_health() {
    let mut s = make_session();
    // 555 + 1 + 45 = 601 > 600 → lands this tick
    s.enemies.push(enemy(EnemyKind::Glaucoma, 100.0, 555.0));
    // far above, unaffected
    s.enemies.push(enemy(EnemyKind::DryEye, 300.0, 50.0));
    let s2 = tick(&s);
    assert_eq!(s2.health, MAX_HEALTH - BOTTOM_PENALTY);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].kind, EnemyKind::DryEye);
    // removed exactly once: a further tick costs nothing more
    let s3 = tick(&s2);
    assert_eq!(s3.health, MAX_HEALTH - BOTTOM_PENALTY);
}

#[test]
fn health_clamps_at_zero_and_ends_session() {
    let mut s = make_session();
    s.health = 10; // penalty is 15, saturates at 0
    s.enemies.push(enemy(EnemyKind::SoreEye, 100.0, 555.0));
    let s2 = tick(&s);
    assert_eq!(s2.health, 0);
    assert_eq!(s2.phase, Phase::Ended);
    assert!(s2.summary.is_some());
}

#[test]
fn degenerate_height_skips_bottom_check() {
    let mut s = make_session();
    s.bounds.height = 0.0;
    s.enemies.push(enemy(EnemyKind::SoreEye, 100.0, 555.0));
    let s2 = tick(&s);
    assert_eq!(s2.health, MAX_HEALTH);
    assert_eq!(s2.enemies.len(), 1);
}

// ── collisions ────────────────────────────────────────────────────────────────

#[test]
fn correct_hit_scores_and_removes_both() {
    let mut s = make_session();
    s.enemies.push(enemy(EnemyKind::DryEye, 100.0, 300.0));
    s.shots.push(shot(ShotKind::Lubricant, 110.0, 310.0));
    let s2 = tick(&s);
    assert_eq!(s2.score, POINTS_CORRECT);
    assert_eq!(s2.correct_hits, 1);
    assert_eq!(s2.wrong_hits, 0);
    assert!(s2.shots.is_empty());
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.explosions.len(), 1);
}

#[test]
fn wrong_hit_penalizes_and_removes_both() {
    let mut s = make_session();
    s.score = 50;
    s.enemies.push(enemy(EnemyKind::DryEye, 100.0, 300.0));
    s.shots.push(shot(ShotKind::Antihistamine, 110.0, 310.0));
    let s2 = tick(&s);
    assert_eq!(s2.score, 30);
    assert_eq!(s2.correct_hits, 0);
    assert_eq!(s2.wrong_hits, 1);
    assert!(s2.shots.is_empty());
    assert!(s2.enemies.is_empty());
}

#[test]
fn wrong_hit_score_floors_at_zero() {
    let mut s = make_session();
    s.score = 5;
    s.enemies.push(enemy(EnemyKind::Glaucoma, 100.0, 300.0));
    s.shots.push(shot(ShotKind::Lubricant, 110.0, 310.0));
    let s2 = tick(&s);
    assert_eq!(s2.score, 0);
    assert_eq!(s2.wrong_hits, 1);
}

#[test]
fn separated_rects_do_not_collide() {
    let mut s = make_session();
    s.enemies.push(enemy(EnemyKind::DryEye, 100.0, 300.0));
    // entirely to the right of the enemy's 45-wide box
    s.shots.push(shot(ShotKind::Lubricant, 200.0, 310.0));
    let s2 = tick(&s);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.shots.len(), 1);
    assert_eq!(s2.score, 0);
}

#[test]
fn shot_destroys_at_most_one_enemy() {
    let mut s = make_session();
    s.enemies.push(enemy(EnemyKind::DryEye, 100.0, 300.0));
    s.enemies.push(enemy(EnemyKind::DryEye, 105.0, 300.0));
    s.shots.push(shot(ShotKind::Lubricant, 110.0, 310.0));
    let s2 = tick(&s);
    assert_eq!(s2.enemies.len(), 1);
    assert!(s2.shots.is_empty());
    assert_eq!(s2.correct_hits, 1);
    assert_eq!(s2.score, POINTS_CORRECT);
}

#[test]
fn destroyed_enemy_cannot_absorb_a_second_shot() {
    let mut s = make_session();
    s.enemies.push(enemy(EnemyKind::DryEye, 100.0, 300.0));
    s.shots.push(shot(ShotKind::Lubricant, 110.0, 310.0));
    s.shots.push(shot(ShotKind::Lubricant, 115.0, 310.0));
    let s2 = tick(&s);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.shots.len(), 1);
    assert_eq!(s2.correct_hits, 1);
}

#[test]
fn impact_flash_expires_after_its_lifetime() {
    let mut s = make_session();
    s.explosions.push(Explosion {
        x: 100.0,
        y: 100.0,
        kind: EnemyKind::DryEye,
        ticks_left: 2,
    });
    let s2 = tick(&s);
    assert_eq!(s2.explosions.len(), 1);
    assert_eq!(s2.explosions[0].ticks_left, 1);
    let s3 = tick(&s2);
    assert!(s3.explosions.is_empty());
}

// ── fire_shot ─────────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_shot_centered_above_player() {
    let s = make_session(); // player at 50% of 800 px → center 400
    let s2 = fire_shot(&s);
    assert_eq!(s2.shots.len(), 1);
    let b = &s2.shots[0];
    assert_eq!(b.kind, ShotKind::Lubricant);
    assert_eq!(b.x, 400.0 - SHOT_WIDTH / 2.0);
    assert_eq!(b.y, player_top(&s.bounds) - SHOT_HEIGHT);
}

#[test]
fn fire_uses_the_selected_treatment() {
    let s = select_shot(&make_session(), ShotKind::Corticosteroid);
    let s2 = fire_shot(&s);
    assert_eq!(s2.shots[0].kind, ShotKind::Corticosteroid);
}

#[test]
fn fire_is_noop_after_end() {
    let s = end_session(&make_session());
    let s2 = fire_shot(&s);
    assert!(s2.shots.is_empty());
}

#[test]
fn fire_is_noop_on_degenerate_width() {
    let mut s = make_session();
    s.bounds.width = 0.0;
    let s2 = fire_shot(&s);
    assert!(s2.shots.is_empty());
}

#[test]
fn fired_shots_get_distinct_ids() {
    let s = fire_shot(&fire_shot(&make_session()));
    assert_eq!(s.shots.len(), 2);
    assert_ne!(s.shots[0].id, s.shots[1].id);
}

// ── select_shot ───────────────────────────────────────────────────────────────

#[test]
fn select_shot_changes_selection() {
    let s = select_shot(&make_session(), ShotKind::Antiglaucoma);
    assert_eq!(s.selected_shot, ShotKind::Antiglaucoma);
}

#[test]
fn select_shot_is_noop_after_end() {
    let s = end_session(&make_session());
    let s2 = select_shot(&s, ShotKind::Antiglaucoma);
    assert_eq!(s2.selected_shot, ShotKind::Lubricant);
}

// ── spawner ───────────────────────────────────────────────────────────────────

#[test]
fn spawn_adds_one_enemy_inside_bounds() {
    let s = make_session();
    let s2 = spawn_enemy(&s, &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 1);
    let e = &s2.enemies[0];
    assert!(e.x >= 0.0);
    assert!(e.x <= s.bounds.width - ENEMY_WIDTH);
    assert_eq!(e.y, SPAWN_Y);
}

#[test]
fn spawned_enemies_get_distinct_ids() {
    let mut rng = seeded_rng();
    let s = spawn_enemy(&spawn_enemy(&make_session(), &mut rng), &mut rng);
    assert_eq!(s.enemies.len(), 2);
    assert_ne!(s.enemies[0].id, s.enemies[1].id);
}

#[test]
fn spawn_is_noop_after_end() {
    let s = end_session(&make_session());
    let s2 = spawn_enemy(&s, &mut seeded_rng());
    assert!(s2.enemies.is_empty());
}

#[test]
fn spawn_is_noop_when_play_area_too_narrow() {
    let mut s = make_session();
    s.bounds.width = ENEMY_WIDTH; // no room for a random offset
    let s2 = spawn_enemy(&s, &mut seeded_rng());
    assert!(s2.enemies.is_empty());
}

// ── timer ─────────────────────────────────────────────────────────────────────

#[test]
fn second_tick_counts_down() {
    let s = make_session();
    let s2 = second_tick(&s);
    assert_eq!(s2.time_left, SESSION_SECONDS - 1);
    assert_eq!(s2.phase, Phase::Active);
}

#[test]
fn timer_reaching_zero_ends_session() {
    let mut s = make_session();
    s.time_left = 1;
    let s2 = second_tick(&s);
    assert_eq!(s2.time_left, 0);
    assert_eq!(s2.phase, Phase::Ended);
    assert!(s2.summary.is_some());
}

#[test]
fn second_tick_is_noop_after_end() {
    let mut s = make_session();
    s.time_left = 1;
    let s2 = second_tick(&s);
    let s3 = second_tick(&s2);
    assert_eq!(s3.time_left, 0);
    assert_eq!(s3.summary, s2.summary);
}

// ── end transition ────────────────────────────────────────────────────────────

#[test]
fn end_records_summary_and_clears_hold_flags() {
    let mut s = make_session();
    s.score = 1200;
    s.correct_hits = 13;
    s.wrong_hits = 7;
    s.moving_left = true;
    let s2 = end_session(&s);
    assert_eq!(s2.phase, Phase::Ended);
    assert!(!s2.moving_left);
    let summary = s2.summary.expect("summary must be recorded");
    assert_eq!(summary.score, 1200);
    assert_eq!(summary.correct, 13);
    assert_eq!(summary.wrong, 7);
    assert_eq!(summary.accuracy, 65.0);
    assert_eq!(summary.badge, Badge::Hero);
}

#[test]
fn end_is_idempotent() {
    let mut s = make_session();
    s.score = 3500;
    s.correct_hits = 17;
    s.wrong_hits = 3;
    let once = end_session(&s);
    let twice = end_session(&once);
    assert_eq!(twice.phase, Phase::Ended);
    assert_eq!(twice.summary, once.summary);
    assert_eq!(twice.score, once.score);
}

#[test]
fn end_with_no_hits_reports_zero_accuracy() {
    let s = end_session(&make_session());
    let summary = s.summary.unwrap();
    assert_eq!(summary.accuracy, 0.0);
    assert_eq!(summary.badge, Badge::Novice);
}

// ── badge selection ───────────────────────────────────────────────────────────

#[test]
fn badge_thresholds() {
    assert_eq!(badge_for(3500, 85.0), Badge::Legend);
    assert_eq!(badge_for(1200, 65.0), Badge::Hero);
    assert_eq!(badge_for(1200, 40.0), Badge::Novice); // score high, accuracy too low
    assert_eq!(badge_for(0, 0.0), Badge::Novice);
}

#[test]
fn badge_boundaries_are_inclusive() {
    assert_eq!(badge_for(3000, 80.0), Badge::Legend);
    assert_eq!(badge_for(2999, 99.0), Badge::Hero);
    assert_eq!(badge_for(1000, 60.0), Badge::Hero);
    assert_eq!(badge_for(999, 99.0), Badge::Novice);
}

#[test]
fn accuracy_percent_handles_empty_and_mixed() {
    assert_eq!(accuracy_percent(0, 0), 0.0);
    assert_eq!(accuracy_percent(3, 1), 75.0);
    assert_eq!(accuracy_percent(0, 5), 0.0);
    assert_eq!(accuracy_percent(5, 0), 100.0);
}

// ── reset transition ──────────────────────────────────────────────────────────

#[test]
fn reset_clears_entities_and_restores_initial_values() {
    let mut s = make_session();
    s.score = 700;
    s.health = 40;
    s.time_left = 12;
    s.selected_shot = ShotKind::Antiglaucoma;
    s.player_x = 10.0;
    s.enemies.push(enemy(EnemyKind::DryEye, 100.0, 300.0));
    s.shots.push(shot(ShotKind::Lubricant, 110.0, 310.0));
    let s2 = reset_session(&end_session(&s));
    assert_eq!(s2.phase, Phase::Idle);
    assert_eq!(s2.score, 0);
    assert_eq!(s2.health, MAX_HEALTH);
    assert_eq!(s2.time_left, SESSION_SECONDS);
    assert_eq!(s2.selected_shot, ShotKind::Lubricant);
    assert_eq!(s2.player_x, 50.0);
    assert!(s2.enemies.is_empty());
    assert!(s2.shots.is_empty());
    assert!(s2.summary.is_none());
}

#[test]
fn reset_from_active_is_permitted() {
    let mut s = make_session();
    s.enemies.push(enemy(EnemyKind::DryEye, 100.0, 300.0));
    let s2 = reset_session(&s);
    assert_eq!(s2.phase, Phase::Idle);
    assert!(s2.enemies.is_empty());
}

#[test]
fn no_mutation_happens_while_idle() {
    let s = reset_session(&make_session());
    let mut rng = seeded_rng();
    let after = spawn_enemy(&second_tick(&tick(&s)), &mut rng);
    assert!(after.enemies.is_empty());
    assert_eq!(after.time_left, SESSION_SECONDS);
    assert_eq!(after.phase, Phase::Idle);
}

#[test]
fn no_mutation_happens_after_end() {
    let mut s = make_session();
    s.enemies.push(enemy(EnemyKind::DryEye, 100.0, 300.0));
    let ended = end_session(&s);
    let ticked = tick(&ended);
    assert_eq!(ticked.enemies[0].y, 300.0);
}

// ── session-wide properties ───────────────────────────────────────────────────

#[test]
fn health_and_time_never_increase_during_a_session() {
    let mut rng = seeded_rng();
    let mut s = start_session(
        Difficulty::Hard,
        Bounds {
            width: 400.0,
            height: 200.0,
        },
    );
    s.moving_right = true;
    let mut last_health = s.health;
    let mut last_time = s.time_left;
    for i in 0..600 {
        s = tick(&s);
        if i % 60 == 0 {
            s = second_tick(&s);
        }
        if i % 40 == 0 {
            s = spawn_enemy(&s, &mut rng);
        }
        if i % 25 == 0 {
            s = fire_shot(&s);
        }
        assert!(s.health <= last_health);
        assert!(s.time_left <= last_time);
        last_health = s.health;
        last_time = s.time_left;
    }
}
