use contracts::{
    Actor, EngineConfig, Instrument, InstrumentKind, NarrationKind, Performer, Scenario, SkillRank,
    SongId, SongKnowledge, SpeciesClass,
};
use song_core::{
    resolve, BeginError, EffectContext, RollSource, SongCatalog, SongEngine, SongWorld, Stage,
    StepOutcome, TargetView,
};

/// Every roll lands on the same value, capped to the roll's range.
struct Fixed(u32);

impl RollSource for Fixed {
    fn rn2(&mut self, n: u32) -> u32 {
        self.0.min(n.saturating_sub(1))
    }
}

fn bard(skill: SkillRank) -> Stage {
    let mut performer = Performer::new("you", 20, skill);
    performer.dexterity = 18;
    performer.charisma = 18;
    Stage::new(performer)
}

fn engine() -> SongEngine<Fixed> {
    SongEngine::with_rolls(EngineConfig::default(), Fixed(0))
}

fn instrument(kind: InstrumentKind) -> Instrument {
    Instrument::new("held", kind)
}

fn texts(stage: &Stage) -> Vec<String> {
    stage.narration().iter().map(|line| line.text.clone()).collect()
}

#[test]
fn lullaby_scales_with_skill() {
    for (skill, frozen) in [(SkillRank::Unskilled, 3), (SkillRank::Expert, 9)] {
        let mut stage = bard(skill);
        stage.add_actor(Actor::new("newt", "the newt", 1).at(1, 0));
        let mut engine = engine();
        let start = engine
            .begin_song(
                &mut stage,
                SongId::Sleep,
                &instrument(InstrumentKind::WoodenHarp),
                &SongKnowledge::bard(),
            )
            .expect("begin");
        assert!(start.started);
        assert!(!start.penalty);

        assert_eq!(engine.step(&mut stage), StepOutcome::Continue);
        let newt = stage.actor("newt").expect("newt");
        assert_eq!(newt.frozen, frozen, "{skill:?}");
        assert!(!newt.can_move);
    }
}

#[test]
fn off_instrument_songs_attack_at_half_strength() {
    let mut stage = bard(SkillRank::Expert);
    stage.add_actor(Actor::new("newt", "the newt", 1).at(1, 0));
    let flute = instrument(InstrumentKind::WoodenFlute);
    let mut engine = engine();
    let start = engine
        .begin_song(&mut stage, SongId::Sleep, &flute, &SongKnowledge::bard())
        .expect("begin");
    assert!(start.penalty);

    let config = EngineConfig::default();
    let song = SongCatalog::song(SongId::Sleep);
    let newt = stage.actor("newt").expect("newt").clone();
    let view = TargetView::new(&newt, true, true);
    let ctx = |penalty| EffectContext {
        song,
        instrument: &flute,
        penalty,
        remaining: song.turns,
        chorus_bonus: 0,
        config: &config,
    };
    let full = resolve(stage.performer(), &view, &ctx(false), &mut Fixed(0));
    let halved = resolve(stage.performer(), &view, &ctx(true), &mut Fixed(0));
    assert_eq!(full.attack, 30);
    assert_eq!(halved.attack, 15);
    assert_eq!(halved.defense, full.defense);
}

#[test]
fn desperate_performers_rally_six_times_harder() {
    let config = EngineConfig::default();
    let drum = instrument(InstrumentKind::LeatherDrum);
    let song = SongCatalog::song(SongId::Courage);
    let ctx = EffectContext {
        song,
        instrument: &drum,
        penalty: false,
        remaining: song.turns,
        chorus_bonus: 0,
        config: &config,
    };
    let mut dog = Actor::new("dog", "the dog", 2);
    dog.tameness = 10;
    let view = TargetView::new(&dog, true, true);

    let mut performer = Performer::new("you", 10, SkillRank::Basic);
    performer.dexterity = 18;
    performer.charisma = 18;
    let healthy = resolve(&performer, &view, &ctx, &mut Fixed(0));

    performer.hp = 5;
    let dying = resolve(&performer, &view, &ctx, &mut Fixed(0));
    assert_eq!(healthy.attack, 18);
    assert_eq!(dying.attack, healthy.attack * 6);
}

#[test]
fn demon_lords_answer_despair_with_a_taunt() {
    let mut stage = bard(SkillRank::Expert);
    let mut lord = Actor::new("orcus", "Orcus", 30).at(1, 0);
    lord.species = SpeciesClass::Demon;
    lord.traits.demon = true;
    lord.traits.demon_lord = true;
    lord.peaceful = true;
    stage.add_actor(lord);

    let mut engine = engine();
    engine
        .begin_song(
            &mut stage,
            SongId::Fear,
            &instrument(InstrumentKind::LeatherDrum),
            &SongKnowledge::bard(),
        )
        .expect("begin");
    stage.play_turn(&mut engine);
    stage.play_turn(&mut engine);

    let lord = stage.actor("orcus").expect("orcus");
    assert!(!lord.peaceful);
    assert!(lord.vengeful);
    assert!(!lord.fleeing);

    let taunts: Vec<_> = stage
        .narration()
        .iter()
        .filter(|line| line.kind == NarrationKind::Speech)
        .collect();
    assert_eq!(taunts.len(), 1);
    assert_eq!(taunts[0].subject.as_deref(), Some("orcus"));
}

#[test]
fn swallowed_performer_befriends_only_the_swallower() {
    let mut stage = bard(SkillRank::Expert);
    stage.add_actor(Actor::new("purple", "the purple worm", 1).at(9, 9));
    stage.add_actor(Actor::new("jackal", "the jackal", 1).at(1, 0));
    stage.performer_mut().swallowed_by = Some("purple".into());

    let mut engine = engine();
    engine
        .begin_song(
            &mut stage,
            SongId::Tame,
            &instrument(InstrumentKind::WoodenFlute),
            &SongKnowledge::bard(),
        )
        .expect("begin");
    engine.step(&mut stage);

    let worm = stage.actor("purple").expect("worm");
    assert!(worm.is_tame());
    assert!(worm.song_friend);
    assert!(!stage.actor("jackal").map_or(true, |a| a.is_tame()));
}

#[test]
fn chorus_is_scanned_once_per_turn() {
    let mut stage = bard(SkillRank::Basic);
    let mut orc = Actor::new("orc", "the hill orc", 4).at(1, 0);
    orc.species = SpeciesClass::Orc;
    orc.tameness = 10;
    stage.add_actor(orc);

    let mut engine = engine();
    engine
        .begin_song(
            &mut stage,
            SongId::Courage,
            &instrument(InstrumentKind::LeatherDrum),
            &SongKnowledge::bard(),
        )
        .expect("begin");

    let shouts = |stage: &Stage| texts(stage).iter().filter(|t| t.ends_with("shouts!")).count();
    for _ in 0..3 {
        assert_eq!(engine.chorus_bonus(&mut stage), 10);
    }
    assert_eq!(shouts(&stage), 1);

    stage.end_turn();
    assert_eq!(engine.chorus_bonus(&mut stage), 10);
    assert_eq!(shouts(&stage), 2);
}

#[test]
fn interruption_ends_the_song_without_practice() {
    let mut stage = bard(SkillRank::Expert);
    stage.add_actor(Actor::new("newt", "the newt", 1).at(1, 0));
    let mut engine = engine();
    engine
        .begin_song(
            &mut stage,
            SongId::Sleep,
            &instrument(InstrumentKind::WoodenHarp),
            &SongKnowledge::bard(),
        )
        .expect("begin");
    assert_eq!(stage.play_turn(&mut engine), StepOutcome::Continue);

    assert!(stage.interrupt_performer());
    assert_eq!(engine.active_song(&stage), None);
    assert_eq!(stage.play_turn(&mut engine), StepOutcome::Idle);
    assert_eq!(stage.performer().practice.skill_uses, 0);
    assert!(!texts(&stage).iter().any(|t| t == "You finish the song."));
}

#[test]
fn a_new_song_replaces_the_old_one() {
    let mut stage = bard(SkillRank::Expert);
    let harp = instrument(InstrumentKind::WoodenHarp);
    let mut engine = engine();
    engine
        .begin_song(&mut stage, SongId::Sleep, &harp, &SongKnowledge::bard())
        .expect("sleep");
    stage.play_turn(&mut engine);
    engine
        .begin_song(&mut stage, SongId::Tame, &harp, &SongKnowledge::bard())
        .expect("tame");

    assert_eq!(engine.active_song(&stage), Some(SongId::Tame));
    assert_eq!(stage.scheduler().occupied_count(), 1);
    let active = engine.session().active().expect("active");
    assert_eq!(active.remaining, 6);
    assert!(active.penalty);
}

#[test]
fn unknown_song_fails_without_occupying_the_performer() {
    let mut stage = bard(SkillRank::Expert);
    let mut engine = engine();
    let start = engine
        .begin_song(
            &mut stage,
            SongId::Sleep,
            &instrument(InstrumentKind::WoodenHarp),
            &SongKnowledge::default(),
        )
        .expect("attempt");
    assert!(!start.started);
    assert_eq!(start.chance, 0);
    assert_eq!(engine.active_song(&stage), None);
    assert_eq!(stage.scheduler().occupied_count(), 0);
    assert_eq!(texts(&stage), vec!["What you produce is quite far from music..."]);
}

#[test]
fn refusals_leave_the_world_untouched() {
    let mut stage = bard(SkillRank::Expert);
    stage.performer_mut().status.underwater = true;
    let mut engine = engine();
    let err = engine
        .begin_song(
            &mut stage,
            SongId::Sleep,
            &instrument(InstrumentKind::WoodenHarp),
            &SongKnowledge::bard(),
        )
        .expect_err("underwater");
    assert_eq!(err, BeginError::Underwater);
    assert!(stage.narration().is_empty());

    stage.performer_mut().status.underwater = false;
    let err = engine
        .begin_song(
            &mut stage,
            SongId::Fear,
            &instrument(InstrumentKind::WoodenHarp),
            &SongKnowledge::bard(),
        )
        .expect_err("harp cannot play despair");
    assert!(matches!(err, BeginError::IncompatibleInstrument { .. }));
}

#[test]
fn scenario_documents_stage_a_full_performance() {
    let raw = r#"{
        "config": { "seed": "7" },
        "performer": {
            "actor_id": "you", "level": 12, "hp": 30, "hp_max": 30,
            "dexterity": 18, "charisma": 16, "skill": "skilled"
        },
        "instrument": { "object_id": "harp", "kind": "wooden_harp" },
        "knowledge": { "is_bard": true },
        "actors": [
            { "actor_id": "jackal", "name": "the jackal", "level": 1,
              "position": { "x": 1, "y": 1 }, "traits": { "animal": true } }
        ]
    }"#;
    let scenario: Scenario = serde_json::from_str(raw).expect("scenario");
    assert_eq!(scenario.config.seed, 7);

    let mut stage = Stage::from_scenario(&scenario);
    let mut engine = SongEngine::with_rolls(scenario.config.clone(), Fixed(0));
    engine
        .begin_song(&mut stage, SongId::Sleep, &scenario.instrument, &scenario.knowledge)
        .expect("begin");

    let mut outcomes = Vec::new();
    loop {
        let outcome = stage.play_turn(&mut engine);
        outcomes.push(outcome);
        if outcome != StepOutcome::Continue {
            break;
        }
    }
    assert_eq!(
        outcomes,
        vec![
            StepOutcome::Continue,
            StepOutcome::Continue,
            StepOutcome::Continue,
            StepOutcome::Finished,
        ]
    );
    assert_eq!(stage.performer().practice.skill_uses, 1);
    assert_eq!(stage.narration().last().map(|l| l.text.as_str()), Some("You finish the song."));
    assert!(stage.actor("jackal").map_or(false, |a| a.frozen > 0));
}

#[test]
fn bundled_scenarios_parse_and_play() {
    for raw in [
        include_str!("../../../scenarios/lullaby_in_the_crypt.json"),
        include_str!("../../../scenarios/warband_courage.json"),
    ] {
        let scenario: Scenario = serde_json::from_str(raw).expect("scenario");
        let menu = SongCatalog::menu(&scenario.instrument, &scenario.knowledge, &scenario.performer);
        let first = menu.first().expect("playable song").song;

        let mut stage = Stage::from_scenario(&scenario);
        let mut engine = SongEngine::new(scenario.config.clone());
        let start = engine
            .begin_song(&mut stage, first, &scenario.instrument, &scenario.knowledge)
            .expect("begin");
        if start.started {
            while stage.play_turn(&mut engine) == StepOutcome::Continue {}
        }
        assert_eq!(engine.active_song(&stage), None);
        assert!(!stage.narration().is_empty());
    }
}
