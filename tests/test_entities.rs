use eyedrop_invaders::entities::*;

#[test]
fn catalogs_have_five_entries() {
    assert_eq!(EnemyKind::ALL.len(), 5);
    assert_eq!(ShotKind::ALL.len(), 5);
}

#[test]
fn every_condition_has_a_distinct_correct_treatment() {
    let mut seen: Vec<ShotKind> = Vec::new();
    for kind in EnemyKind::ALL {
        let treatment = kind.correct_shot();
        assert!(!seen.contains(&treatment), "{treatment:?} mapped twice");
        seen.push(treatment);
    }
    assert_eq!(seen.len(), ShotKind::ALL.len());
}

#[test]
fn treatment_catalog() {
    assert_eq!(EnemyKind::DryEye.correct_shot(), ShotKind::Lubricant);
    assert_eq!(
        EnemyKind::Conjunctivitis.correct_shot(),
        ShotKind::Antihistamine
    );
    assert_eq!(EnemyKind::SoreEye.correct_shot(), ShotKind::Decongestant);
    assert_eq!(EnemyKind::RedEye.correct_shot(), ShotKind::Corticosteroid);
    assert_eq!(EnemyKind::Glaucoma.correct_shot(), ShotKind::Antiglaucoma);
}

#[test]
fn labels_are_nonempty() {
    for kind in EnemyKind::ALL {
        assert!(!kind.label().is_empty());
    }
    for kind in ShotKind::ALL {
        assert!(!kind.label().is_empty());
    }
    for badge in [Badge::Legend, Badge::Hero, Badge::Novice] {
        assert!(!badge.label().is_empty());
    }
}
