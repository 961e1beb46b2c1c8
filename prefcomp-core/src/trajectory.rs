//! Trajectories, fragments and flattened transitions.
use crate::{error::PrefCompError, record::Record};
use anyhow::Result;

/// A trajectory with per-step rewards.
///
/// `O` and `A` are the observation and action types. A trajectory of length
/// `n` has `n + 1` observations, `n` actions and `n` rewards.
/// `terminal` is `true` if the episode ended in a terminal state and `false`
/// if it was cut off.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<O, A> {
    /// Observations, one more than actions.
    pub obs: Vec<O>,

    /// Actions.
    pub acts: Vec<A>,

    /// Optional per-step auxiliary information.
    pub infos: Option<Vec<Record>>,

    /// Per-step rewards.
    pub rews: Vec<f32>,

    /// Whether the trajectory ended in a terminal state.
    pub terminal: bool,
}

/// An ordered pair of trajectory fragments.
///
/// Preferences attached to a pair are the probability that the first
/// fragment is preferred over the second.
pub type FragmentPair<O, A> = (Trajectory<O, A>, Trajectory<O, A>);

impl<O, A> Trajectory<O, A> {
    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.acts.len()
    }

    /// Returns `true` if the trajectory has no transitions.
    pub fn is_empty(&self) -> bool {
        self.acts.is_empty()
    }
}

impl<O: Clone, A: Clone> Trajectory<O, A> {
    /// Constructs a trajectory, checking the lengths of its fields.
    pub fn new(
        obs: Vec<O>,
        acts: Vec<A>,
        infos: Option<Vec<Record>>,
        rews: Vec<f32>,
        terminal: bool,
    ) -> Result<Self> {
        if obs.len() != acts.len() + 1 {
            return Err(PrefCompError::InvalidTrajectory(format!(
                "{} observations for {} actions",
                obs.len(),
                acts.len()
            ))
            .into());
        }
        if rews.len() != acts.len() {
            return Err(PrefCompError::InvalidTrajectory(format!(
                "{} rewards for {} actions",
                rews.len(),
                acts.len()
            ))
            .into());
        }
        if let Some(infos) = &infos {
            if infos.len() != acts.len() {
                return Err(PrefCompError::InvalidTrajectory(format!(
                    "{} infos for {} actions",
                    infos.len(),
                    acts.len()
                ))
                .into());
            }
        }

        Ok(Self {
            obs,
            acts,
            infos,
            rews,
            terminal,
        })
    }

    /// Cuts out the fragment of transitions `[start, end)`.
    ///
    /// The fragment holds the observations `[start, end]`. It is terminal
    /// only if it reaches the end of a terminal trajectory.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.len() {
            return Err(PrefCompError::InvalidTrajectory(format!(
                "fragment [{}, {}) out of a trajectory of length {}",
                start,
                end,
                self.len()
            ))
            .into());
        }

        Ok(Self {
            obs: self.obs[start..end + 1].to_vec(),
            acts: self.acts[start..end].to_vec(),
            infos: self.infos.as_ref().map(|infos| infos[start..end].to_vec()),
            rews: self.rews[start..end].to_vec(),
            terminal: end == self.len() && self.terminal,
        })
    }

    /// Flattens the trajectory into transitions.
    pub fn flatten(&self) -> Transitions<O, A> {
        let n = self.len();
        let mut dones = vec![false; n];
        if self.terminal && n > 0 {
            dones[n - 1] = true;
        }

        Transitions {
            obs: self.obs[..n].to_vec(),
            acts: self.acts.clone(),
            next_obs: self.obs[1..].to_vec(),
            dones,
            infos: self.infos.clone(),
        }
    }
}

/// Transitions `(o_t, a_t, o_t+1, done_t)` flattened out of trajectories.
#[derive(Debug, Clone, PartialEq)]
pub struct Transitions<O, A> {
    /// Observations `o_t`.
    pub obs: Vec<O>,

    /// Actions `a_t`.
    pub acts: Vec<A>,

    /// Next observations `o_t+1`.
    pub next_obs: Vec<O>,

    /// `true` at the last transition of a terminal trajectory.
    pub dones: Vec<bool>,

    /// Optional per-step auxiliary information.
    pub infos: Option<Vec<Record>>,
}

impl<O, A> Transitions<O, A> {
    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.acts.len()
    }

    /// Returns `true` if there is no transition.
    pub fn is_empty(&self) -> bool {
        self.acts.is_empty()
    }
}

/// Flattens a sequence of trajectories into a single set of transitions.
///
/// Infos are kept only if every trajectory carries them.
pub fn flatten_trajectories<O: Clone, A: Clone>(
    trajectories: &[Trajectory<O, A>],
) -> Transitions<O, A> {
    let keep_infos = trajectories.iter().all(|t| t.infos.is_some());
    let mut transitions = Transitions {
        obs: vec![],
        acts: vec![],
        next_obs: vec![],
        dones: vec![],
        infos: if keep_infos { Some(vec![]) } else { None },
    };

    for traj in trajectories {
        let t = traj.flatten();
        transitions.obs.extend(t.obs);
        transitions.acts.extend(t.acts);
        transitions.next_obs.extend(t.next_obs);
        transitions.dones.extend(t.dones);
        if let (Some(dst), Some(src)) = (transitions.infos.as_mut(), t.infos) {
            dst.extend(src);
        }
    }

    transitions
}

/// Computes the discounted sum of rewards, `Σ_t discount^t * rews[t]`.
pub fn discounted_return(rews: &[f32], discount: f32) -> f32 {
    if discount == 1.0 {
        return rews.iter().sum();
    }
    rews.iter().rev().fold(0f32, |acc, r| r + discount * acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trajectory(n: usize, terminal: bool) -> Trajectory<f32, i64> {
        Trajectory::new(
            (0..=n).map(|i| i as f32).collect(),
            (0..n).map(|i| i as i64).collect(),
            None,
            (0..n).map(|i| i as f32 * 0.1).collect(),
            terminal,
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_inconsistent_lengths() {
        let err =
            Trajectory::<f32, i64>::new(vec![0.0, 1.0], vec![0, 1], None, vec![0.0, 0.0], true)
                .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrefCompError>(),
            Some(PrefCompError::InvalidTrajectory(_))
        ));

        let err = Trajectory::<f32, i64>::new(vec![0.0, 1.0], vec![0], None, vec![], true)
            .unwrap_err();
        assert!(err.downcast_ref::<PrefCompError>().is_some());

        let infos = Some(vec![Record::empty(), Record::empty()]);
        assert!(
            Trajectory::<f32, i64>::new(vec![0.0, 1.0], vec![0], infos, vec![0.0], true).is_err()
        );
    }

    #[test]
    fn test_len_without_clone() {
        #[derive(Debug, PartialEq)]
        struct Frame;

        let traj = Trajectory {
            obs: vec![Frame, Frame, Frame],
            acts: vec![Frame, Frame],
            infos: None,
            rews: vec![0.0, 1.0],
            terminal: true,
        };
        assert_eq!(traj.len(), 2);
        assert!(!traj.is_empty());
    }

    #[test]
    fn test_slice() -> Result<()> {
        let traj = trajectory(10, true);

        let frag = traj.slice(2, 5)?;
        assert_eq!(frag.obs, vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(frag.acts, vec![2, 3, 4]);
        assert_eq!(frag.len(), 3);
        assert!(!frag.terminal);

        let frag = traj.slice(7, 10)?;
        assert_eq!(frag.obs.len(), 4);
        assert!(frag.terminal);

        let frag = trajectory(10, false).slice(7, 10)?;
        assert!(!frag.terminal);

        assert!(traj.slice(8, 11).is_err());
        Ok(())
    }

    #[test]
    fn test_flatten() {
        let t = trajectory(3, true).flatten();
        assert_eq!(t.obs, vec![0.0, 1.0, 2.0]);
        assert_eq!(t.next_obs, vec![1.0, 2.0, 3.0]);
        assert_eq!(t.dones, vec![false, false, true]);

        let t = flatten_trajectories(&[trajectory(2, false), trajectory(3, true)]);
        assert_eq!(t.len(), 5);
        assert_eq!(t.dones, vec![false, false, false, false, true]);
        assert!(t.infos.is_none());
    }

    #[test]
    fn test_discounted_return() {
        assert_eq!(discounted_return(&[1.0, 2.0, 3.0], 1.0), 6.0);
        assert_eq!(discounted_return(&[1.0, 2.0, 4.0], 0.5), 3.0);
        assert_eq!(discounted_return(&[], 0.9), 0.0);
    }
}
