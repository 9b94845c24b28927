use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::int_code::{
    com::{ExecutionState, IntCodeComputer},
    io::Channel,
};

/// Every ordering of a set of phase numbers.
pub struct AmpSettings {
    settings: Vec<Vec<i64>>,
}

impl From<&[i64]> for AmpSettings {
    fn from(init_setting: &[i64]) -> Self {
        AmpSettings {
            settings: Self::gen_permutation(init_setting),
        }
    }
}

impl AmpSettings {
    pub fn new(amp_count: usize) -> AmpSettings {
        let init_setting = (0..amp_count as i64).collect::<Vec<_>>();
        Self::from(init_setting.as_slice())
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[i64]> {
        self.settings.iter().map(|v| v.as_slice())
    }

    pub fn par_iter(&self) -> impl ParallelIterator<Item = &[i64]> {
        self.settings.par_iter().map(|v| v.as_slice())
    }

    fn gen_permutation(init_numbers: &[i64]) -> Vec<Vec<i64>> {
        let mut permutations = Vec::new();
        if init_numbers.is_empty() {
            return permutations;
        }

        let mut numbers = Vec::from(init_numbers);
        let number_count = numbers.len();
        Self::gen_permutation_recur(&mut permutations, &mut numbers, number_count);
        permutations
    }

    // Heap's algorithm
    fn gen_permutation_recur(
        permutations: &mut Vec<Vec<i64>>,
        numbers: &mut [i64],
        cur_size: usize,
    ) {
        if cur_size <= 1 {
            permutations.push(Vec::from(&*numbers));
            return;
        }

        for i in 0..cur_size {
            Self::gen_permutation_recur(permutations, numbers, cur_size - 1);

            if cur_size % 2 == 1 {
                numbers.swap(0, cur_size - 1);
            } else {
                numbers.swap(i, cur_size - 1);
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Amplifier #{0} failed in execution({1})")]
    Execution(usize, #[source] crate::Error),
    #[error("Amplifier #{0} halted without any output")]
    EmptyAmplifierOutput(usize),
    #[error("All running amplifiers in loop are blocked by requiring input")]
    AmplifierLoopStuck,
    #[error("No phase setting given to amplifiers")]
    NoPhaseSettings,
}

/// Runs one amplifier per phase in series, each one gets its phase then the previous signal.
pub fn amp_chain(int_code: &[i64], settings: &[i64]) -> Result<i64, Error> {
    if settings.is_empty() {
        return Err(Error::NoPhaseSettings);
    }

    let mut amp_res = 0;
    for (i, &phase) in settings.iter().enumerate() {
        let mut amp = IntCodeComputer::new(int_code, Channel::new(&[phase, amp_res]));
        amp.run_to_halt().map_err(|e| Error::Execution(i, e))?;
        amp_res = amp
            .stream_mut()
            .pop_output()
            .ok_or(Error::EmptyAmplifierOutput(i))?;
    }

    Ok(amp_res)
}

/// Runs amplifiers in a loop, the last one feeding the first, until the last one halts.
///
/// Returns the last signal sent by the last amplifier.
pub fn amp_loop(int_code: &[i64], settings: &[i64]) -> Result<i64, Error> {
    if settings.is_empty() {
        return Err(Error::NoPhaseSettings);
    }

    let amp_count = settings.len();
    let mut amps = settings
        .iter()
        .enumerate()
        .map(|(i, &phase)| {
            let init_input = if i == 0 { vec![phase, 0] } else { vec![phase] };
            IntCodeComputer::new(int_code, Channel::new(&init_input))
        })
        .collect::<Vec<_>>();

    let mut last_signal = None;
    while !amps.iter().all(|amp| amp.is_halted()) {
        let mut progressed = false;
        for i in 0..amp_count {
            if amps[i].is_halted() {
                continue;
            }

            match amps[i].run_to_pause() {
                Ok(ExecutionState::PausedOnOutput) => {
                    progressed = true;
                    let signal = amps[i]
                        .stream_mut()
                        .pop_output()
                        .ok_or(Error::EmptyAmplifierOutput(i))?;
                    if i + 1 == amp_count {
                        last_signal = Some(signal);
                    }
                    amps[(i + 1) % amp_count].stream_mut().push_input(signal);
                }
                Ok(_) => progressed = true,
                Err(crate::Error::NotEnoughInput) => {
                    debug!(amp = i, "amplifier waits for signal");
                }
                Err(e) => return Err(Error::Execution(i, e)),
            }
        }

        if !progressed {
            return Err(Error::AmplifierLoopStuck);
        }
    }

    last_signal.ok_or(Error::EmptyAmplifierOutput(amp_count - 1))
}

/// Tries every ordering of `phases` and returns the largest signal with the setting giving it.
pub fn best_setting(
    int_code: &[i64],
    phases: &[i64],
    feedback: bool,
) -> Result<(i64, Vec<i64>), Error> {
    let settings = AmpSettings::from(phases);
    debug!(count = settings.len(), feedback, "search amplifier settings");
    let results = settings
        .par_iter()
        .map(|setting| -> Result<(i64, Vec<i64>), Error> {
            let signal = if feedback {
                amp_loop(int_code, setting)
            } else {
                amp_chain(int_code, setting)
            }?;
            Ok((signal, Vec::from(setting)))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    results
        .into_iter()
        .max_by_key(|(signal, _)| *signal)
        .ok_or(Error::NoPhaseSettings)
}
