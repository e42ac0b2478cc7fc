use super::*;

/// Movement points lost per affected turn.
fn movement_loss(skill: SkillRank, normal_speed: i32) -> i32 {
    match skill {
        SkillRank::Unskilled | SkillRank::Basic => normal_speed / 2,
        SkillRank::Skilled => normal_speed * 3 / 4,
        SkillRank::Expert => normal_speed - 1,
    }
}

pub(super) fn apply(world: &mut dyn SongWorld, ctx: &EffectContext<'_>, rolls: &mut dyn RollSource) {
    let performer = world.performer().clone();
    let radius = ctx.radius(&performer);
    let loss = movement_loss(performer.skill, ctx.config.normal_speed);

    for actor_id in world.actor_ids() {
        let Some(actor) = world.actor(&actor_id) else {
            continue;
        };
        if !actor.is_alive()
            || !within(&performer, actor, radius)
            || !affected_by_peace_song(actor, performer.skill)
        {
            continue;
        }
        let affected = roll_against(world, &performer, &actor_id, ctx, rolls)
            .map_or(false, |roll| roll.affected());
        if !affected {
            continue;
        }

        let visible = world.performer_can_see(&actor_id);
        let Some(actor) = world.actor_mut(&actor_id) else {
            continue;
        };
        actor.movement -= loss;
        let name = actor.name.clone();
        let whirly = actor.traits.whirly;

        if ctx.first_turn() && visible {
            narrate_about(world, &actor_id, format!("{} seems slower.", capitalized(&name)));
        }

        if whirly && performer.swallowed_by.as_deref() == Some(actor_id.as_str()) {
            world.narrate(
                NarrationKind::Performer,
                Some(&actor_id),
                format!("You disrupt {name}!"),
            );
            world.narrate(NarrationKind::Sight, None, "A huge hole opens up...".into());
            world.expel_performer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_grows_with_skill() {
        let losses: Vec<i32> = SkillRank::ALL
            .iter()
            .map(|skill| movement_loss(*skill, 12))
            .collect();
        assert_eq!(losses, vec![6, 6, 9, 11]);
    }
}
