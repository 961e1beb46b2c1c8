//! Utilities for the Bradley-Terry preference model.
use anyhow::Result;
use candle_core::Tensor;

/// Computes `Σ_t discount^t * rews[t]` of a 1-dimensional tensor.
///
/// The result is a scalar tensor.
pub fn discounted_sum(rews: &Tensor, discount: f64) -> Result<Tensor> {
    if discount == 1.0 {
        return Ok(rews.sum_all()?);
    }
    let n = rews.dims1()?;
    let discounts: Vec<f32> = (0..n).map(|t| discount.powi(t as i32) as f32).collect();
    let discounts = Tensor::from_vec(discounts, (n,), rews.device())?;
    Ok((rews * discounts)?.sum_all()?)
}

/// Probability that the first fragment is preferred.
///
/// `diff` is the difference of returns, second minus first, already clipped.
/// With probability `noise_prob` the preference is assumed to be uniformly
/// random.
pub fn preference_probability(diff: &Tensor, noise_prob: f64) -> Result<Tensor> {
    let p = (diff.exp()? + 1.0)?.recip()?;
    Ok(p.affine(1.0 - noise_prob, noise_prob / 2.0)?)
}

/// Binary cross-entropy between the predicted and the target preferences.
///
/// `log(1 - p)` is evaluated as the log of the mirrored probability, with
/// `diff` negated, so that it does not round to `log(0)` when `p` is close
/// to 1.
pub fn preference_cross_entropy(
    diff: &Tensor,
    targets: &Tensor,
    noise_prob: f64,
) -> Result<Tensor> {
    let log_p1 = preference_probability(diff, noise_prob)?.log()?;
    let log_p2 = preference_probability(&diff.neg()?, noise_prob)?.log()?;
    let ce = ((targets * log_p1)? + (targets.affine(-1.0, 1.0)? * log_p2)?)?;
    Ok(ce.mean_all()?.neg()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_discounted_sum() -> Result<()> {
        let rews = Tensor::new(&[1f32, 2.0, 4.0], &Device::Cpu)?;
        assert_eq!(discounted_sum(&rews, 1.0)?.to_scalar::<f32>()?, 7.0);
        assert_eq!(discounted_sum(&rews, 0.5)?.to_scalar::<f32>()?, 3.0);
        Ok(())
    }

    #[test]
    fn test_preference_probability() -> Result<()> {
        let diff = Tensor::new(&[0f32, 50.0, -50.0], &Device::Cpu)?;
        let p = preference_probability(&diff, 0.0)?.to_vec1::<f32>()?;
        assert_eq!(p[0], 0.5);
        assert!(p[1] > 0.0 && p[1] < 1e-20);
        assert_eq!(p[2], 1.0);

        let p = preference_probability(&diff, 1.0)?.to_vec1::<f32>()?;
        assert_eq!(p, vec![0.5, 0.5, 0.5]);
        Ok(())
    }

    #[test]
    fn test_cross_entropy_is_finite_at_the_clip() -> Result<()> {
        let diff = Tensor::new(&[50f32, -50.0], &Device::Cpu)?;
        let targets = Tensor::new(&[1f32, 0.0], &Device::Cpu)?;
        let loss = preference_cross_entropy(&diff, &targets, 0.0)?.to_scalar::<f32>()?;
        assert!((loss - 50.0).abs() < 1e-3);

        let targets = Tensor::new(&[0f32, 1.0], &Device::Cpu)?;
        let loss = preference_cross_entropy(&diff, &targets, 0.0)?.to_scalar::<f32>()?;
        assert!(loss.abs() < 1e-6);
        Ok(())
    }
}
