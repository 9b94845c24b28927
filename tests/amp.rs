use intcode::{
    amp::{amp_chain, amp_loop, best_setting, AmpSettings, Error},
    int_code::read_int_code,
};

#[test]
fn settings_cover_all_permutations() {
    let settings = AmpSettings::new(5);
    assert_eq!(settings.len(), 120);

    let mut sorted = settings.iter().map(Vec::from).collect::<Vec<_>>();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), 120);
    assert!(sorted.iter().all(|s| {
        let mut s = s.clone();
        s.sort();
        s == vec![0, 1, 2, 3, 4]
    }));

    let empty: &[i64] = &[];
    assert!(AmpSettings::from(empty).is_empty());
    let single: &[i64] = &[7];
    assert_eq!(
        AmpSettings::from(single).iter().collect::<Vec<_>>(),
        vec![single]
    );
}

#[test]
fn chain_passes_signal_through_amplifiers() {
    let int_code = read_int_code("tests/inputs/amp_chain.txt").unwrap();
    assert_eq!(amp_chain(&int_code, &[4, 3, 2, 1, 0]).unwrap(), 43210);
    assert!(matches!(amp_chain(&int_code, &[]), Err(Error::NoPhaseSettings)));
}

#[test]
fn chain_best_setting() {
    let int_code = read_int_code("tests/inputs/amp_chain.txt").unwrap();
    let (signal, setting) = best_setting(&int_code, &[0, 1, 2, 3, 4], false).unwrap();
    assert_eq!(signal, 43210);
    assert_eq!(setting, vec![4, 3, 2, 1, 0]);
}

#[test]
fn loop_feeds_last_amplifier_back() {
    let int_code = read_int_code("tests/inputs/amp_loop.txt").unwrap();
    assert_eq!(amp_loop(&int_code, &[9, 8, 7, 6, 5]).unwrap(), 139629729);
}

#[test]
fn loop_best_setting() {
    let int_code = read_int_code("tests/inputs/amp_loop.txt").unwrap();
    let (signal, setting) = best_setting(&int_code, &[5, 6, 7, 8, 9], true).unwrap();
    assert_eq!(signal, 139629729);
    assert_eq!(setting, vec![9, 8, 7, 6, 5]);
}

#[test]
fn amplifier_without_output_is_reported() {
    // Reads its phase and signal, then halts silently
    let int_code = [3, 0, 3, 0, 99];
    assert!(matches!(
        amp_chain(&int_code, &[0, 1]),
        Err(Error::EmptyAmplifierOutput(0))
    ));
}

#[test]
fn loop_waiting_forever_is_stuck() {
    // Every amplifier wants two more inputs than the loop ever carries
    let int_code = [3, 0, 3, 0, 3, 0, 4, 0, 99];
    assert!(matches!(
        amp_loop(&int_code, &[1, 2]),
        Err(Error::AmplifierLoopStuck)
    ));
}

#[test]
fn execution_error_names_amplifier() {
    let int_code = [3, 0, 3, 0, 42];
    assert!(matches!(
        amp_chain(&int_code, &[0, 1]),
        Err(Error::Execution(0, intcode::Error::InvalidOpcode(42)))
    ));
}
