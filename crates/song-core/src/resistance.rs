//! Per-target resistance: does this turn of the song reach this actor?
//!
//! The attack level comes from the performer (charisma weighs more than
//! dexterity here), the defense level from the target. Each song class has
//! its own small set of modifiers, looked up from a table.

use contracts::{Actor, InstrumentKind, Performer, SongClass, SongId, SpeciesClass, TraitSet};
use tracing::debug;

use crate::effects::{capitalized, EffectContext};
use crate::rng::RollSource;
use crate::world::SongWorld;

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// What the resolver needs to know about a target, captured once per roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetView {
    pub actor_id: String,
    pub name: String,
    pub level: i32,
    pub hp: i32,
    pub hp_max: i32,
    pub species: SpeciesClass,
    pub traits: TraitSet,
    pub coaligned: bool,
    pub performer_sees: bool,
    pub sees_performer: bool,
}

impl TargetView {
    pub fn new(actor: &Actor, performer_sees: bool, sees_performer: bool) -> Self {
        Self {
            actor_id: actor.actor_id.clone(),
            name: actor.name.clone(),
            level: actor.level,
            hp: actor.hp,
            hp_max: actor.hp_max,
            species: actor.species,
            traits: actor.traits.clone(),
            coaligned: actor.coaligned,
            performer_sees,
            sees_performer,
        }
    }

    pub fn capture(world: &dyn SongWorld, actor_id: &str) -> Option<Self> {
        let actor = world.actor(actor_id)?;
        Some(Self::new(
            actor,
            world.performer_can_see(actor_id),
            world.actor_can_see_performer(actor_id),
        ))
    }

    fn health_below_percent(&self, percent: i32) -> bool {
        i64::from(self.hp) * 100 < i64::from(self.hp_max) * i64::from(percent)
    }
}

/// Optional line narrated when an affected target reacts to the music.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Swings,
    Dances,
    TooHurt,
    Surviving,
}

impl Flavor {
    pub fn line(self, name: &str) -> String {
        let name = capitalized(name);
        match self {
            Flavor::Swings => format!("{name} seems to briefly swing with your music."),
            Flavor::Dances => format!("{name} briefly dances with your music."),
            Flavor::TooHurt => format!("{name} is too hurt to listen to your song."),
            Flavor::Surviving => {
                format!("{name} cares more about surviving than listening to your music!")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResistanceRoll {
    pub attack: i32,
    pub defense: i32,
    /// `attack - defense`; non-negative means affected.
    pub margin: i32,
    pub flavor: Option<Flavor>,
}

impl ResistanceRoll {
    pub fn affected(&self) -> bool {
        self.margin >= 0
    }
}

// ---------------------------------------------------------------------------
// Class modifiers
// ---------------------------------------------------------------------------

struct Levels {
    attack: i32,
    defense: i32,
    /// Defense before any class modifier.
    base: i32,
    flavor: Option<Flavor>,
}

struct ModifierInput<'a> {
    performer: &'a Performer,
    target: &'a TargetView,
    ctx: &'a EffectContext<'a>,
    /// Flavor lines are only considered on the first turn for visible targets.
    show_flavor: bool,
}

type ClassModifiers = fn(&mut Levels, &ModifierInput<'_>, &mut dyn RollSource);

fn class_modifiers(class: SongClass) -> ClassModifiers {
    match class {
        SongClass::Peaceful => peaceful_modifiers,
        SongClass::Unsettling => unsettling_modifiers,
        SongClass::Rousing => rousing_modifiers,
        SongClass::Plain => plain_modifiers,
    }
}

fn peaceful_modifiers(levels: &mut Levels, input: &ModifierInput<'_>, rolls: &mut dyn RollSource) {
    let traits = &input.target.traits;
    let kind = input.ctx.instrument.kind;
    let base = levels.base;

    if traits.mindless {
        levels.defense += base / 10;
    }
    // music calms the beasts
    if traits.animal {
        levels.defense -= base / 10;
    }
    if traits.domestic {
        levels.defense -= base / 10;
    }
    if traits.likes_magic {
        levels.defense += base / 5;
    }
    if traits.same_race {
        levels.defense -= base / 10;
    }
    if traits.undead || traits.demon {
        levels.defense += 50;
    }
    if traits.always_hostile {
        levels.defense += base / 10;
    }
    if traits.race_peaceful {
        levels.defense -= base / 10;
    }

    let species = input.target.species;
    if species == SpeciesClass::Rodent && kind == InstrumentKind::WoodenFlute {
        levels.defense -= base / 5;
        if input.show_flavor {
            levels.flavor = Some(Flavor::Swings);
        }
    }
    if species == SpeciesClass::Angel
        && input.target.coaligned
        && kind == InstrumentKind::WoodenHarp
    {
        levels.defense -= base / 5;
    }
    if matches!(species, SpeciesClass::Snake | SpeciesClass::Naga)
        && kind == InstrumentKind::WoodenFlute
    {
        levels.defense -= base / 5;
        if input.show_flavor {
            levels.flavor = Some(Flavor::Dances);
        }
    }

    if input.ctx.instrument.is_peace_artifact() {
        levels.attack += input.performer.skill.index() * 5;
    }

    // badly hurt targets care little for music
    if input.target.health_below_percent(60) {
        levels.defense *= 2;
        if input.show_flavor && rolls.one_in(input.ctx.config.hurt_flavor_odds) {
            levels.flavor = Some(Flavor::TooHurt);
        }
    }
    if input.target.health_below_percent(30) {
        levels.defense *= 5;
        if input.show_flavor && rolls.one_in(input.ctx.config.dying_flavor_odds) {
            levels.flavor = Some(Flavor::Surviving);
        }
    }
}

fn unsettling_modifiers(levels: &mut Levels, input: &ModifierInput<'_>, _: &mut dyn RollSource) {
    let traits = &input.target.traits;
    let song = input.ctx.song.id;
    let base = levels.base;

    if input.ctx.instrument.is_peace_artifact() {
        levels.attack /= 2;
    }
    if song == SongId::Fear && traits.undead {
        levels.defense -= base / 3;
    }
    if song == SongId::Fear && traits.demon {
        levels.defense -= base / 5;
    }
    if !input.target.sees_performer {
        levels.defense -= base / 5;
    }
    if song == SongId::Confusion && input.target.sees_performer {
        levels.defense += base / 5;
    }
}

fn rousing_modifiers(levels: &mut Levels, input: &ModifierInput<'_>, _: &mut dyn RollSource) {
    let traits = &input.target.traits;
    let base = levels.base;

    // Both multipliers apply below 30%.
    if input.performer.health_below_percent(60) {
        levels.attack *= 2;
    }
    if input.performer.health_below_percent(30) {
        levels.attack *= 3;
    }
    if traits.always_hostile {
        levels.defense -= base / 5;
    }
    if traits.race_hostile {
        levels.defense -= base / 5;
    }
    if traits.mercenary {
        levels.defense -= base / 5;
    }
}

fn plain_modifiers(_: &mut Levels, _: &ModifierInput<'_>, _: &mut dyn RollSource) {}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Attack level before class modifiers and the mismatch penalty.
pub fn base_attack(performer: &Performer, ctx: &EffectContext<'_>) -> i32 {
    let rank = performer.skill.index() + 1;
    let mut attack = (rank * performer.charisma + performer.dexterity) / 3;
    attack += ctx.instrument.blessing.sign() * 5;
    attack += (ctx.chorus_bonus - ctx.remaining as i32).max(0);
    if performer.status.cannot_vocalize {
        attack /= 2;
    }
    attack
}

pub fn base_defense(target: &TargetView) -> i32 {
    if target.traits.golem {
        100
    } else {
        target.level * 2
    }
}

/// Roll the active song against one target.
pub fn resolve(
    performer: &Performer,
    target: &TargetView,
    ctx: &EffectContext<'_>,
    rolls: &mut dyn RollSource,
) -> ResistanceRoll {
    let defense = base_defense(target);
    let mut levels = Levels {
        attack: base_attack(performer, ctx),
        defense,
        base: defense,
        flavor: None,
    };

    let input = ModifierInput {
        performer,
        target,
        ctx,
        show_flavor: ctx.first_turn() && target.performer_sees,
    };
    class_modifiers(ctx.song.class)(&mut levels, &input, rolls);

    if levels.defense < 1 {
        levels.defense = if target.traits.mimic { performer.level } else { 1 };
    }
    if ctx.penalty {
        levels.attack /= 2;
    }

    let margin = levels.attack - levels.defense;
    debug!(
        actor = %target.actor_id,
        song = %ctx.song.id,
        attack = levels.attack,
        defense = levels.defense,
        margin,
        "resistance roll"
    );

    ResistanceRoll {
        attack: levels.attack,
        defense: levels.defense,
        margin,
        flavor: levels.flavor,
    }
}
