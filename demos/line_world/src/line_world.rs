//! A walker on a line and an agent acting greedily on the learned reward.
use anyhow::Result;
use prefcomp_candle::{BasicRewardNet, RewardNet};
use prefcomp_core::{record::Logger, Trajectory, TrajectoryGenerator, Transitions};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub type Obs = Vec<f32>;
pub type Act = Vec<f32>;

/// Positions are `0..=WIDTH`.
pub const WIDTH: i64 = 10;
pub const GOAL: i64 = 7;
pub const HORIZON: usize = 20;
const MOVES: [i64; 3] = [-1, 0, 1];

pub const OBS_DIM: usize = 1;
pub const ACT_DIM: usize = MOVES.len();

fn obs(x: i64) -> Obs {
    vec![x as f32 / WIDTH as f32]
}

fn one_hot(a: usize) -> Act {
    let mut v = vec![0.0; ACT_DIM];
    v[a] = 1.0;
    v
}

fn step(x: i64, a: usize) -> i64 {
    (x + MOVES[a]).clamp(0, WIDTH)
}

/// Ground-truth reward of arriving at `x`.
pub fn true_reward(x: i64) -> f32 {
    -((x - GOAL).abs() as f32) / WIDTH as f32
}

/// Samples episodes of fixed length with an epsilon-greedy one-step
/// lookahead on the learned reward.
///
/// The reward net is shared with the reward trainer, so the policy follows
/// the latest learned reward. Training anneals epsilon.
pub struct LineWorldGenerator {
    reward_net: BasicRewardNet,
    epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    rng: StdRng,
    logger: Logger,
}

impl LineWorldGenerator {
    pub fn new(reward_net: BasicRewardNet, seed: u64) -> Self {
        Self {
            reward_net,
            epsilon: 1.0,
            epsilon_decay: 0.8,
            min_epsilon: 0.05,
            rng: StdRng::seed_from_u64(seed),
            logger: Logger::default(),
        }
    }

    /// Makes the policy fully greedy.
    pub fn greedy(mut self) -> Self {
        self.epsilon = 0.0;
        self.min_epsilon = 0.0;
        self
    }

    fn act(&mut self, x: i64) -> Result<usize> {
        if self.rng.gen_bool(self.epsilon) {
            return Ok(self.rng.gen_range(0..ACT_DIM));
        }

        let transitions = Transitions {
            obs: vec![obs(x); ACT_DIM],
            acts: (0..ACT_DIM).map(one_hot).collect(),
            next_obs: (0..ACT_DIM).map(|a| obs(step(x, a))).collect(),
            dones: vec![false; ACT_DIM],
            infos: None,
        };
        let rews = self.reward_net.rewards(&transitions)?;
        Ok(rews
            .iter()
            .enumerate()
            .max_by(|(_, r1), (_, r2)| r1.total_cmp(r2))
            .map_or(1, |(a, _)| a))
    }

    fn rollout(&mut self) -> Result<Trajectory<Obs, Act>> {
        let mut x = self.rng.gen_range(0..=WIDTH);
        let mut observations = vec![obs(x)];
        let mut acts = vec![];
        let mut rews = vec![];

        for _ in 0..HORIZON {
            let a = self.act(x)?;
            x = step(x, a);
            observations.push(obs(x));
            acts.push(one_hot(a));
            rews.push(true_reward(x));
        }

        Trajectory::new(observations, acts, None, rews, true)
    }

    /// Mean ground-truth return over `n` episodes.
    pub fn evaluate(&mut self, n: usize) -> Result<f32> {
        let mut sum = 0.0;
        for _ in 0..n {
            sum += self.rollout()?.rews.iter().sum::<f32>();
        }
        Ok(sum / n.max(1) as f32)
    }
}

impl TrajectoryGenerator<Obs, Act> for LineWorldGenerator {
    fn sample(&mut self, steps: usize) -> Result<Vec<Trajectory<Obs, Act>>> {
        let mut trajectories = vec![self.rollout()?];
        while trajectories.len() * HORIZON < steps {
            trajectories.push(self.rollout()?);
        }
        Ok(trajectories)
    }

    fn train(&mut self, steps: usize) -> Result<()> {
        for _ in 0..steps.div_ceil(HORIZON) {
            let traj = self.rollout()?;
            let learned = self.reward_net.rewards(&traj.flatten())?;
            self.logger
                .record_scalar("true_return", traj.rews.iter().sum::<f32>());
            self.logger
                .record_scalar("learned_return", learned.iter().sum::<f32>());
        }
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
        self.logger.record_scalar("epsilon", self.epsilon as f32);
        Ok(())
    }

    fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{Device, Tensor};
    use prefcomp_candle::{BasicRewardNetConfig, RewardNetBase};

    fn reward_net() -> Result<BasicRewardNet> {
        let config = BasicRewardNetConfig::default()
            .obs_dim(OBS_DIM)
            .act_dim(ACT_DIM)
            .hidden_units(vec![])
            .use_state(false)
            .use_action(false)
            .use_next_state(true);
        BasicRewardNet::build(config, Device::Cpu)
    }

    #[test]
    fn test_fixed_horizon_episodes() -> Result<()> {
        let mut generator = LineWorldGenerator::new(reward_net()?, 0);
        let trajs = generator.sample(50)?;
        assert_eq!(trajs.len(), 3);
        assert!(trajs.iter().all(|t| t.len() == HORIZON && t.terminal));
        Ok(())
    }

    #[test]
    fn test_greedy_policy_follows_the_learned_reward() -> Result<()> {
        // The learned reward grows to the right
        let net = reward_net()?;
        {
            let data = net.varmap().data().lock().unwrap();
            data["mlp.ln0.weight"].set(&Tensor::new(&[[1f32]], &Device::Cpu)?)?;
        }
        let mut generator = LineWorldGenerator::new(net, 0).greedy();
        let traj = generator.rollout()?;
        assert_eq!(traj.obs.last().unwrap()[0], 1.0);
        Ok(())
    }
}
