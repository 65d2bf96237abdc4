use mrfdict::report::DictionaryReport;
use mrfdict::{
    AbortReason, ConfigurationError, Dictionary, DictionaryConfig, DictionaryError, MaterialKind,
    SequenceKind, ValueDict, Variant, run, run_values,
};

fn small_config() -> DictionaryConfig {
    DictionaryConfig {
        materials: MaterialKind::Default,
        sequence: SequenceKind::Default,
        ..Default::default()
    }
}

#[test]
fn run_reports_inputs_progress_and_result() {
    let mut messages = Vec::new();
    let dict = run(&small_config(), &mut |msg| {
        messages.push(msg);
        Ok(())
    })
    .unwrap();

    assert_eq!(dict.shape(), (13, 500, 3));
    assert!(messages[0].starts_with("materials: 13 tuples"));
    assert!(messages[1].starts_with("sequence: 500 blocks"));
    let progress: Vec<_> = messages.iter().filter(|m| m.starts_with("block ")).collect();
    assert_eq!(progress.len(), 10);
    assert_eq!(progress.last().unwrap().as_str(), "block 500/500");
    assert_eq!(
        messages.last().unwrap(),
        &DictionaryReport::from(&dict).to_string()
    );
}

#[test]
fn message_fn_can_abort_the_run() {
    let mut blocks_seen = 0;
    let result = run(&small_config(), &mut |msg| {
        if msg.starts_with("block ") {
            blocks_seen += 1;
            if blocks_seen == 3 {
                return Err(AbortReason::ReceiverClosed);
            }
        }
        Ok(())
    });
    assert!(matches!(
        result,
        Err(DictionaryError::Aborted(AbortReason::ReceiverClosed))
    ));
    assert_eq!(blocks_seen, 3);
}

#[test]
fn fisp_variant_fails_before_any_message() {
    let config = DictionaryConfig {
        variant: Variant::Fisp,
        ..small_config()
    };
    let mut messages = 0;
    let err = run(&config, &mut |_| {
        messages += 1;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(
        err,
        DictionaryError::Configuration(ConfigurationError::UnimplementedVariant("fisp"))
    ));
    assert_eq!(messages, 0);
}

#[test]
fn run_values_matches_typed_run() {
    let mut values = ValueDict::new();
    values
        .insert("materials", "default")
        .insert("sequence", "bssfp")
        .insert("seed", 4i64);
    let from_values = run_values(values, &mut |_| Ok(())).unwrap();

    let config = DictionaryConfig {
        materials: MaterialKind::Default,
        sequence: SequenceKind::Bssfp,
        variant: Variant::Bssfp,
        seed: 4,
    };
    let typed = run(&config, &mut |_| Ok(())).unwrap();
    assert_eq!(from_values, typed);
}

#[test]
fn run_values_rejects_bad_configuration() {
    let mut values = ValueDict::new();
    values.insert("variant", "spgr");
    let err = run_values(values, &mut |_| Ok(())).unwrap_err();
    assert!(matches!(
        err,
        DictionaryError::Configuration(ConfigurationError::UnknownCategory { kind: "variant", .. })
    ));
}

#[test]
fn saved_dictionary_loads_back() {
    let dict = run(&small_config(), &mut |_| Ok(())).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("default.mrfd");

    dict.save(&path).unwrap();
    let loaded = Dictionary::load(&path).unwrap();
    assert_eq!(loaded, dict);
}
