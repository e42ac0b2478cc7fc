use super::*;
use crate::catalog::SongCatalog;
use crate::world::Stage;
use contracts::{InstrumentKind, SpeciesClass};

/// Every roll returns the same value, capped to the roll's range.
struct Fixed(u32);

impl RollSource for Fixed {
    fn rn2(&mut self, n: u32) -> u32 {
        self.0.min(n.saturating_sub(1))
    }
}

fn stage(level: i32, skill: SkillRank) -> Stage {
    let mut performer = Performer::new("you", level, skill);
    performer.charisma = 18;
    performer.dexterity = 18;
    Stage::new(performer)
}

fn play(
    stage: &mut Stage,
    song: SongId,
    instrument: &Instrument,
    turns_done: u32,
    rolls: &mut dyn RollSource,
) {
    let config = EngineConfig::default();
    let song = SongCatalog::song(song);
    let ctx = EffectContext {
        song,
        instrument,
        penalty: false,
        remaining: song.turns - turns_done,
        chorus_bonus: 0,
        config: &config,
    };
    applier_for(song.id)(stage, &ctx, rolls);
}

fn texts(stage: &Stage) -> Vec<String> {
    stage.narration().iter().map(|line| line.text.clone()).collect()
}

fn harp() -> Instrument {
    Instrument::new("harp", InstrumentKind::WoodenHarp)
}

#[test]
fn radius_grows_with_rank_and_level() {
    let config = EngineConfig::default();
    let harp = harp();
    let ctx = EffectContext {
        song: SongCatalog::song(SongId::Sleep),
        instrument: &harp,
        penalty: false,
        remaining: 4,
        chorus_bonus: 0,
        config: &config,
    };
    assert_eq!(ctx.radius(&Performer::new("you", 1, SkillRank::Unskilled)), 9);
    assert_eq!(ctx.radius(&Performer::new("you", 20, SkillRank::Expert)), 46);
    assert!(ctx.first_turn());
}

#[test]
fn capitalizes_sentence_starts() {
    assert_eq!(capitalized("the newt"), "The newt");
    assert_eq!(capitalized("Orcus"), "Orcus");
    assert_eq!(capitalized(""), "");
}

#[test]
fn flee_timer_accumulates() {
    let mut actor = Actor::new("m", "the gnome", 1);
    assert!(flee(&mut actor, 3));
    assert_eq!(actor.flee_timer, 3);
    assert!(!flee(&mut actor, 3));
    assert_eq!(actor.flee_timer, 6);

    let mut calm = Actor::new("m", "the gnome", 1);
    flee(&mut calm, 1);
    assert_eq!(calm.flee_timer, 2);

    let mut forever = Actor::new("m", "the gnome", 1);
    flee(&mut forever, 0);
    flee(&mut forever, 5);
    assert_eq!(forever.flee_timer, 0);
    assert!(forever.fleeing);
}

// ---------------------------------------------------------------------------
// Sleep
// ---------------------------------------------------------------------------

#[test]
fn sleep_freezes_and_stacks() {
    let mut stage = stage(20, SkillRank::Expert);
    stage.add_actor(Actor::new("newt", "the newt", 1).at(1, 0));

    play(&mut stage, SongId::Sleep, &harp(), 0, &mut Fixed(0));
    let newt = stage.actor("newt").expect("newt");
    assert_eq!(newt.frozen, 9);
    assert!(!newt.can_move);

    play(&mut stage, SongId::Sleep, &harp(), 1, &mut Fixed(0));
    assert_eq!(stage.actor("newt").map(|a| a.frozen), Some(18));
    assert_eq!(
        texts(&stage),
        vec!["The newt sleeps.", "The newt moves while sleeping."]
    );
}

#[test]
fn sleep_caps_the_counter() {
    let mut stage = stage(20, SkillRank::Expert);
    let mut newt = Actor::new("newt", "the newt", 1).at(1, 0);
    newt.frozen = 125;
    stage.add_actor(newt);
    play(&mut stage, SongId::Sleep, &harp(), 0, &mut Fixed(0));
    assert_eq!(stage.actor("newt").map(|a| a.frozen), Some(127));
}

#[test]
fn skilled_performers_spare_their_pets() {
    let mut pet = Actor::new("dog", "the little dog", 1).at(1, 0);
    pet.tameness = 10;

    let mut skilled = stage(20, SkillRank::Skilled);
    skilled.add_actor(pet.clone());
    play(&mut skilled, SongId::Sleep, &harp(), 0, &mut Fixed(0));
    assert_eq!(skilled.actor("dog").map(|a| a.frozen), Some(0));

    let mut novice = stage(20, SkillRank::Basic);
    novice.add_actor(pet);
    play(&mut novice, SongId::Sleep, &harp(), 0, &mut Fixed(0));
    assert_eq!(novice.actor("dog").map(|a| a.frozen), Some(2));
}

#[test]
fn harp_singers_are_never_lulled_as_pets() {
    let mut elf = Actor::new("elf", "the Woodland-elf", 1).at(1, 0);
    elf.species = SpeciesClass::Elf;
    elf.tameness = 10;
    let mut stage = stage(20, SkillRank::Basic);
    stage.add_actor(elf);
    play(&mut stage, SongId::Sleep, &harp(), 0, &mut Fixed(0));
    assert!(stage.actor("elf").map_or(false, |a| a.can_move));
}

#[test]
fn out_of_range_targets_are_ignored() {
    let mut stage = stage(1, SkillRank::Unskilled);
    stage.add_actor(Actor::new("newt", "the newt", 1).at(3, 0));
    play(&mut stage, SongId::Sleep, &harp(), 0, &mut Fixed(0));
    assert!(stage.actor("newt").map_or(false, |a| a.can_move));
}

// ---------------------------------------------------------------------------
// Confusion and slow
// ---------------------------------------------------------------------------

#[test]
fn confusion_leaves_allies_alone() {
    let mut stage = stage(20, SkillRank::Expert);
    stage.add_actor(Actor::new("orc", "the hill orc", 1).at(1, 0));
    let mut pet = Actor::new("dog", "the little dog", 1).at(0, 1);
    pet.tameness = 10;
    stage.add_actor(pet);

    let horn = Instrument::new("horn", InstrumentKind::TooledHorn);
    play(&mut stage, SongId::Confusion, &horn, 0, &mut Fixed(0));
    assert!(stage.actor("orc").map_or(false, |a| a.confused));
    assert!(!stage.actor("dog").map_or(true, |a| a.confused));
    assert_eq!(texts(&stage), vec!["The hill orc seems confused."]);
}

#[test]
fn slow_drains_movement_and_breaks_vortices() {
    let mut stage = stage(20, SkillRank::Expert);
    let mut vortex = Actor::new("vortex", "the fog cloud", 3);
    vortex.traits.whirly = true;
    stage.add_actor(vortex);
    stage.performer_mut().swallowed_by = Some("vortex".into());

    let flute = Instrument::new("flute", InstrumentKind::WoodenFlute);
    play(&mut stage, SongId::Slow, &flute, 0, &mut Fixed(0));
    assert_eq!(stage.actor("vortex").map(|a| a.movement), Some(1));
    assert!(stage.performer().swallowed_by.is_none());
    assert_eq!(
        texts(&stage),
        vec![
            "The fog cloud seems slower.",
            "You disrupt the fog cloud!",
            "A huge hole opens up...",
        ]
    );
}

// ---------------------------------------------------------------------------
// Fear
// ---------------------------------------------------------------------------

#[test]
fn fear_sends_ordinary_foes_running() {
    let mut stage = stage(20, SkillRank::Basic);
    let mut gnome = Actor::new("gnome", "the gnome", 1).at(1, 0);
    gnome.peaceful = true;
    stage.add_actor(gnome);

    let drum = Instrument::new("drum", InstrumentKind::LeatherDrum);
    play(&mut stage, SongId::Fear, &drum, 0, &mut Fixed(99));
    let gnome = stage.actor("gnome").expect("gnome");
    assert!(gnome.fleeing);
    assert_eq!(gnome.flee_timer, 3);
    assert!(!gnome.peaceful);
    assert_eq!(texts(&stage), vec!["The gnome turns to flee!"]);
}

#[test]
fn fear_rarely_keeps_the_peace() {
    let mut stage = stage(20, SkillRank::Unskilled);
    let mut gnome = Actor::new("gnome", "the gnome", 1).at(1, 0);
    gnome.peaceful = true;
    stage.add_actor(gnome);

    let drum = Instrument::new("drum", InstrumentKind::LeatherDrum);
    play(&mut stage, SongId::Fear, &drum, 0, &mut Fixed(0));
    let gnome = stage.actor("gnome").expect("gnome");
    assert!(gnome.peaceful);
    assert!(gnome.fleeing);
    assert_eq!(gnome.flee_timer, 0);
}

#[test]
fn fear_can_win_over_the_undead() {
    let mut zombie = Actor::new("zombie", "the kobold zombie", 1).at(1, 0);
    zombie.traits.undead = true;
    zombie.traits.mindless = true;
    let drum = Instrument::new("drum", InstrumentKind::LeatherDrum);

    let mut won = stage(20, SkillRank::Expert);
    won.add_actor(zombie.clone());
    play(&mut won, SongId::Fear, &drum, 0, &mut Fixed(0));
    assert!(won.actor("zombie").map_or(false, |a| a.peaceful));
    assert_eq!(texts(&won), vec!["The kobold zombie groans in the rhythm of your music."]);

    let mut startled = stage(20, SkillRank::Expert);
    startled.add_actor(zombie);
    play(&mut startled, SongId::Fear, &drum, 0, &mut Fixed(99));
    let zombie = startled.actor("zombie").expect("zombie");
    assert!(!zombie.peaceful);
    assert_eq!(zombie.movement, 0);
    assert_eq!(
        texts(&startled),
        vec!["The kobold zombie stops to hear your music for a moment."]
    );
}

#[test]
fn demon_lords_only_get_angrier() {
    let mut stage = stage(20, SkillRank::Expert);
    let mut lord = Actor::new("orcus", "Orcus", 30).at(1, 0);
    lord.species = SpeciesClass::Demon;
    lord.traits.demon = true;
    lord.traits.demon_lord = true;
    lord.peaceful = true;
    stage.add_actor(lord);

    let drum = Instrument::new("drum", InstrumentKind::LeatherDrum);
    play(&mut stage, SongId::Fear, &drum, 0, &mut Fixed(0));
    let lord = stage.actor("orcus").expect("orcus");
    assert!(!lord.peaceful);
    assert!(lord.vengeful);
    assert_eq!(
        texts(&stage),
        vec![
            "Orcus laughs fiendishly!",
            "Thou playest thy own funeral march, weakling!",
        ]
    );
    assert_eq!(stage.narration()[1].kind, NarrationKind::Speech);

    play(&mut stage, SongId::Fear, &drum, 1, &mut Fixed(0));
    assert_eq!(stage.narration().len(), 2);
}

// ---------------------------------------------------------------------------
// Tame and courage
// ---------------------------------------------------------------------------

#[test]
fn tame_makes_song_friends() {
    let mut stage = stage(20, SkillRank::Expert);
    let mut jackal = Actor::new("jackal", "the jackal", 1).at(1, 0);
    jackal.fleeing = true;
    stage.add_actor(jackal);
    let mut kitten = Actor::new("kitten", "the kitten", 1).at(0, 1);
    kitten.tameness = 7;
    stage.add_actor(kitten);
    let mut shopkeeper = Actor::new("shk", "Asidonhopo", 1).at(1, 1);
    shopkeeper.traits.untameable = true;
    shopkeeper.peaceful = true;
    stage.add_actor(shopkeeper);

    let flute = Instrument::new("flute", InstrumentKind::WoodenFlute);
    play(&mut stage, SongId::Tame, &flute, 0, &mut Fixed(0));

    let jackal = stage.actor("jackal").expect("jackal");
    assert_eq!(jackal.tameness, 11);
    assert!(jackal.song_friend);
    assert!(jackal.peaceful);
    assert!(!jackal.was_peaceful);
    assert!(!jackal.fleeing);

    let kitten = stage.actor("kitten").expect("kitten");
    assert_eq!(kitten.tameness, 7);
    assert!(!kitten.song_friend);

    assert!(!stage.actor("shk").map_or(true, |a| a.is_tame()));
    assert_eq!(texts(&stage), vec!["The jackal seems to like your song."]);

    play(&mut stage, SongId::Tame, &flute, 1, &mut Fixed(0));
    assert_eq!(stage.actor("jackal").map(|a| a.tameness), Some(17));
    assert_eq!(stage.narration().len(), 1);
}

#[test]
fn swallowed_performer_can_only_charm_the_swallower() {
    let mut stage = stage(20, SkillRank::Expert);
    stage.add_actor(Actor::new("purple", "the purple worm", 1).at(30, 30));
    stage.add_actor(Actor::new("jackal", "the jackal", 1).at(1, 0));
    stage.performer_mut().swallowed_by = Some("purple".into());

    let flute = Instrument::new("flute", InstrumentKind::WoodenFlute);
    play(&mut stage, SongId::Tame, &flute, 0, &mut Fixed(0));
    let worm = stage.actor("purple").expect("worm");
    assert!(worm.song_friend);
    assert_eq!(worm.tameness, 5);
    assert!(!stage.actor("jackal").map_or(true, |a| a.is_tame()));
    assert!(stage.narration().is_empty());

    play(&mut stage, SongId::Tame, &flute, 1, &mut Fixed(0));
    assert_eq!(stage.actor("purple").map(|a| a.tameness), Some(5));
}

#[test]
fn courage_rallies_allies_only() {
    let mut stage = stage(20, SkillRank::Basic);
    let mut dog = Actor::new("dog", "the dog", 1).at(1, 0);
    dog.tameness = 10;
    dog.fleeing = true;
    dog.flee_timer = 8;
    stage.add_actor(dog);
    stage.add_actor(Actor::new("orc", "the hill orc", 1).at(0, 1));

    let drum = Instrument::new("drum", InstrumentKind::LeatherDrum);
    play(&mut stage, SongId::Courage, &drum, 0, &mut Fixed(0));
    let dog = stage.actor("dog").expect("dog");
    assert_eq!(dog.morale, 12);
    assert_eq!(dog.flee_timer, 4);
    assert_eq!(stage.actor("orc").map(|a| a.morale), Some(0));

    play(&mut stage, SongId::Courage, &drum, 1, &mut Fixed(0));
    play(&mut stage, SongId::Courage, &drum, 2, &mut Fixed(0));
    assert_eq!(stage.actor("dog").map(|a| a.morale), Some(24));
    assert_eq!(
        texts(&stage),
        vec!["The dog looks wild!", "The dog looks berserk!", "The dog looks berserk!"]
    );
}
