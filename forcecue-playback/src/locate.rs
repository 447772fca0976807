use forcecue_core::TrialSample;

/// Sample whose timestamp is nearest to `elapsed_s`. On a tie the earlier
/// sample wins. Past the last timestamp the last sample is returned; ending
/// playback is the caller's job. `None` only for an empty slice.
pub fn locate(samples: &[TrialSample], elapsed_s: f64) -> Option<&TrialSample> {
    let (first, rest) = samples.split_first()?;
    Some(rest.iter().fold(first, |closest, sample| {
        if (sample.time - elapsed_s).abs() < (closest.time - elapsed_s).abs() {
            sample
        } else {
            closest
        }
    }))
}
