use std::collections::{BTreeMap, HashMap, HashSet};

use combat_core::{AgentId, AnimationEvent, AnimationService, Clip, ServiceError};

#[derive(Clone, Copy, Debug)]
struct Playing {
    clip: Clip,
    elapsed: f32,
    duration: f32,
    hit_sent: bool,
}

/// Clock-driven stand-in for an animation graph.
///
/// Each clip has a fixed duration. Attack clips raise a hit window partway
/// through; every clip raises `Finished` when it runs out. Stopped or frozen
/// actors raise nothing.
#[derive(Clone, Debug)]
pub struct SimAnimation {
    durations: HashMap<Clip, f32>,
    hit_fraction: f32,
    missing: HashSet<Clip>,
    playing: BTreeMap<AgentId, Playing>,
    frozen: HashSet<AgentId>,
}

impl SimAnimation {
    pub const DEFAULT_HIT_FRACTION: f32 = 0.4;

    pub fn new() -> Self {
        let durations = HashMap::from([
            (Clip::Attack, 1.2),
            (Clip::RangedAttack, 1.5),
            (Clip::Ultimate, 2.2),
            (Clip::Block, 1.0),
            (Clip::Dodge, 0.8),
            (Clip::Death, 1.6),
        ]);
        Self {
            durations,
            hit_fraction: Self::DEFAULT_HIT_FRACTION,
            missing: HashSet::new(),
            playing: BTreeMap::new(),
            frozen: HashSet::new(),
        }
    }

    pub fn with_duration(mut self, clip: Clip, secs: f32) -> Self {
        self.durations.insert(clip, secs);
        self
    }

    /// Makes every `play_segment` of `clip` fail.
    pub fn without_clip(mut self, clip: Clip) -> Self {
        self.missing.insert(clip);
        self
    }

    pub fn playing(&self, agent: AgentId) -> Option<Clip> {
        self.playing.get(&agent).map(|playing| playing.clip)
    }

    pub fn is_frozen(&self, agent: AgentId) -> bool {
        self.frozen.contains(&agent)
    }

    fn strikes(clip: Clip) -> bool {
        matches!(clip, Clip::Attack | Clip::RangedAttack | Clip::Ultimate)
    }
}

impl Default for SimAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationService for SimAnimation {
    fn play_segment(
        &mut self,
        agent: AgentId,
        clip: Clip,
        section: &'static str,
    ) -> Result<(), ServiceError> {
        let duration = match self.durations.get(&clip) {
            Some(&duration) if !self.missing.contains(&clip) => duration,
            _ => {
                return Err(ServiceError::MissingClip {
                    clip: clip.into(),
                    section,
                });
            }
        };
        self.frozen.remove(&agent);
        self.playing.insert(
            agent,
            Playing {
                clip,
                elapsed: 0.0,
                duration,
                hit_sent: false,
            },
        );
        Ok(())
    }

    fn stop_all(&mut self, agent: AgentId, _blend_out: f32) {
        self.playing.remove(&agent);
    }

    fn freeze(&mut self, agent: AgentId) {
        self.playing.remove(&agent);
        self.frozen.insert(agent);
    }

    fn poll(&mut self, dt: f32) -> Vec<AnimationEvent> {
        let hit_fraction = self.hit_fraction;
        let mut events = Vec::new();

        self.playing.retain(|&agent, playing| {
            playing.elapsed += dt.max(0.0);
            if Self::strikes(playing.clip)
                && !playing.hit_sent
                && playing.elapsed >= playing.duration * hit_fraction
            {
                playing.hit_sent = true;
                events.push(AnimationEvent::HitWindow { agent });
            }
            if playing.elapsed >= playing.duration {
                events.push(AnimationEvent::Finished { agent });
                return false;
            }
            true
        });
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{ActorRegistry, PlayerCharacter, Position};

    fn actor() -> AgentId {
        ActorRegistry::new().spawn(|id| PlayerCharacter::new(id, Position::ORIGIN))
    }

    #[test]
    fn attack_raises_hit_then_finished() {
        let agent = actor();
        let mut anim = SimAnimation::new().with_duration(Clip::Attack, 1.0);
        anim.play_segment(agent, Clip::Attack, "Attack01").unwrap();

        assert!(anim.poll(0.25).is_empty());
        assert_eq!(anim.poll(0.25), [AnimationEvent::HitWindow { agent }]);
        assert_eq!(anim.poll(0.5), [AnimationEvent::Finished { agent }]);
        assert_eq!(anim.playing(agent), None);
    }

    #[test]
    fn block_never_opens_a_hit_window() {
        let agent = actor();
        let mut anim = SimAnimation::new().with_duration(Clip::Block, 0.5);
        anim.play_segment(agent, Clip::Block, "Default").unwrap();
        assert_eq!(anim.poll(1.0), [AnimationEvent::Finished { agent }]);
    }

    #[test]
    fn missing_clip_fails_and_freeze_silences() {
        let agent = actor();
        let mut anim = SimAnimation::new().without_clip(Clip::Dodge);
        assert!(matches!(
            anim.play_segment(agent, Clip::Dodge, "Left"),
            Err(ServiceError::MissingClip { clip: "dodge", .. })
        ));

        anim.play_segment(agent, Clip::Death, "Death01").unwrap();
        anim.freeze(agent);
        assert!(anim.is_frozen(agent));
        assert!(anim.poll(10.0).is_empty());
    }
}
