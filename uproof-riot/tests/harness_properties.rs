//! Soundness and coverage properties of the RIOT harnesses.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use uproof_error::ViolationKind;
    use uproof_foundation::{
        Explorer, FieldDef, Harness, Loaded, ProofOutcome, Ptr, Replay, ScriptedSource, StubCx,
        Symbolic, Value,
    };
    use uproof_riot::{
        deps::{EventPoster, NondetEventPoster, NondetTimer, TimerScheduler},
        event_timeout::COVER_SET,
        harnesses::{
            EventTimeoutLifecycle, EventTimeoutSet, UsbusRegisterEventHandler,
            UsbusRegisterEventHandlerTwice,
        },
        explore_all,
        layouts::{EVENT_TIMEOUT_T, HANDLER_NEXT, USBUS_HANDLERS, USBUS_HANDLER_T, USBUS_T},
        registry,
        usbus::{COVER_APPEND, COVER_EMPTY, COVER_WALK},
        TimerModel,
    };

    fn usbus_scenario(has_existing_handler: bool, handler_allocated: bool) -> ScriptedSource {
        ScriptedSource::new()
            .with("usbus_len", USBUS_T.size as u64)
            .with("usbus_allocated", 1)
            .with("has_existing_handler", u64::from(has_existing_handler))
            .with("has_existing_handler_node0_allocated", 1)
            .with("handler_len", USBUS_HANDLER_T.size as u64)
            .with("handler_allocated", u64::from(handler_allocated))
    }

    fn load_ptr(replay: &Replay, ptr: Ptr, field: &FieldDef) -> Ptr {
        match replay.artifacts.heap.load(ptr, field, "test").unwrap() {
            Loaded::Value(value) => value.as_ptr(),
            Loaded::Havoc => Ptr::Wild,
        }
    }

    #[test]
    fn timeout_zero_on_exact_descriptor_does_not_fault() {
        let source = ScriptedSource::new()
            .with("event_timeout_len", EVENT_TIMEOUT_T.size as u64)
            .with("event_timeout_allocated", 1)
            .with("timeout", 0);
        let replay = Explorer::default().replay(&EventTimeoutSet::new(), source);
        assert_eq!(replay.result, Ok(()));
        assert!(replay.artifacts.coverage.contains(COVER_SET));
        assert_eq!(replay.artifacts.stub_calls.len(), 1);
        assert_eq!(replay.artifacts.stub_calls[0].stub, "ztimer_set");
    }

    #[test]
    fn null_handler_on_one_node_list_does_not_fault() {
        let replay = Explorer::default().replay(&UsbusRegisterEventHandler, usbus_scenario(true, false));
        assert_eq!(replay.result, Ok(()));
        assert!(replay.unused_points.is_empty());

        let node = replay
            .artifacts
            .heap
            .by_site("has_existing_handler_node0")
            .map(|allocation| allocation.base())
            .unwrap();
        // the null handler was appended behind the existing node
        assert_eq!(load_ptr(&replay, node, &HANDLER_NEXT), Ptr::Null);
        assert!(replay.artifacts.coverage.contains(COVER_APPEND));
    }

    #[test]
    fn empty_list_is_observed_without_existing_handler() {
        let replay = Explorer::default().replay(&UsbusRegisterEventHandler, usbus_scenario(false, true));
        assert_eq!(replay.result, Ok(()));
        assert!(replay.artifacts.coverage.contains(COVER_EMPTY));
        assert!(!replay.artifacts.coverage.contains(COVER_WALK));

        let usbus = replay.artifacts.heap.by_site("usbus").map(|a| a.base()).unwrap();
        let handler = replay.artifacts.heap.by_site("handler").map(|a| a.base()).unwrap();
        assert_eq!(load_ptr(&replay, usbus, &USBUS_HANDLERS), handler);
        assert!(replay.artifacts.heap.by_site("has_existing_handler_node0").is_none());
    }

    #[test]
    fn existing_handler_is_one_well_formed_node() {
        let replay = Explorer::default().replay(&UsbusRegisterEventHandler, usbus_scenario(true, true));
        assert_eq!(replay.result, Ok(()));
        assert!(replay.artifacts.coverage.contains(COVER_WALK));

        let heap = &replay.artifacts.heap;
        let usbus = heap.by_site("usbus").map(|a| a.base()).unwrap();
        let node = heap.by_site("has_existing_handler_node0").map(|a| a.base()).unwrap();
        let handler = heap.by_site("handler").map(|a| a.base()).unwrap();
        assert_eq!(load_ptr(&replay, usbus, &USBUS_HANDLERS), node);
        assert_eq!(load_ptr(&replay, node, &HANDLER_NEXT), handler);
    }

    #[test]
    fn timeout_stays_unrestricted() {
        let report = Explorer::default().explore(&EventTimeoutSet::new());
        assert_eq!(report.outcome, ProofOutcome::Verified);
        assert!(report.coverage_reductions.is_empty());
        assert!(report.assumptions.iter().all(|assumption| assumption.subject != "timeout"));
        assert!(report.stubs.contains("ztimer_set"));
        assert!(report.stub_calls > 0);
    }

    #[test]
    fn narrowing_the_timeout_is_flagged() {
        let harness = EventTimeoutSet::new()
            .with_timeout(Symbolic::<u32>::at_least("timeout", 1).must_stay_free());
        let report = Explorer::default().explore(&harness);
        assert_eq!(report.outcome, ProofOutcome::Verified);
        assert_eq!(report.coverage_reductions.len(), 1);
        assert_eq!(report.coverage_reductions[0].subject, "timeout");
    }

    #[test]
    fn narrowed_timeout_is_flagged_without_opting_in() {
        let harness =
            EventTimeoutSet::new().with_timeout(Symbolic::<u32>::in_range("timeout", 0, 10));
        let report = Explorer::default().explore(&harness);
        assert_eq!(report.outcome, ProofOutcome::Verified);
        assert_eq!(report.coverage_reductions.len(), 1);
        assert_eq!(report.coverage_reductions[0].subject, "timeout");
        assert_eq!(report.coverage_reductions[0].description, "0 <= timeout <= 10");
    }

    #[test]
    fn renamed_timeout_still_counts_as_free() {
        let harness =
            EventTimeoutSet::new().with_timeout(Symbolic::<u32>::at_least("ticks", 5));
        let report = Explorer::default().explore(&harness);
        assert_eq!(report.outcome, ProofOutcome::Verified);
        assert_eq!(
            report
                .coverage_reductions
                .iter()
                .map(|reduction| reduction.subject.as_str())
                .collect::<Vec<_>>(),
            vec!["ticks"]
        );
    }

    #[test]
    fn registered_harnesses_verify_except_double_registration() {
        let reports = explore_all(&Explorer::default(), &[]);
        assert_eq!(reports.len(), registry().len());
        for report in &reports {
            let expected = if report.harness == UsbusRegisterEventHandlerTwice.name() {
                ProofOutcome::Failed
            } else {
                ProofOutcome::Verified
            };
            assert_eq!(report.outcome, expected, "{}", report);
        }
    }

    #[test]
    fn explore_all_honours_the_name_filter() {
        let reports = explore_all(&Explorer::default(), &["event_timeout_clear"]);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].target, "event_timeout_clear");
    }

    #[test]
    fn tracking_timer_model_also_verifies() {
        let harness = EventTimeoutSet::new().with_timers(TimerModel::Tracking);
        let report = Explorer::default().explore(&harness);
        assert_eq!(report.outcome, ProofOutcome::Verified);
        assert!(report.sampled_points.iter().any(|point| point == "ztimer_set#0"));
    }

    #[test]
    fn lifecycle_reaches_every_branch() {
        let report = Explorer::default().explore(&EventTimeoutLifecycle);
        assert_eq!(report.outcome, ProofOutcome::Verified);
        assert!(report.coverage.missed.is_empty(), "missed {:?}", report.coverage.missed);
    }

    #[test]
    fn double_registration_follows_uninitialized_link() {
        let harness = UsbusRegisterEventHandlerTwice;
        let report = Explorer::default().explore(&harness);
        assert_eq!(report.outcome, ProofOutcome::Failed);
        assert_eq!(report.counterexamples.len(), 1);
        assert_eq!(report.stats.bounded_paths, 0);

        let counterexample = &report.counterexamples[0];
        assert_eq!(counterexample.violation.kind, ViolationKind::InvalidPointer);
        assert_eq!(counterexample.violation.field, "next");
        assert_eq!(counterexample.value_of("first_handler_allocated"), Some(1));

        let replay = Explorer::default().replay(&harness, counterexample.to_script());
        assert_eq!(
            replay.result.unwrap_err().violation().map(|violation| violation.kind),
            Some(ViolationKind::InvalidPointer)
        );
    }

    proptest! {
        #[test]
        fn stubs_accept_any_pointer(
            clock_null in any::<bool>(),
            offset in any::<u32>(),
            now in any::<u32>(),
        ) {
            let clock = if clock_null { Ptr::Null } else { Ptr::Wild };
            let mut source = ScriptedSource::new().with("ztimer_set#0", u64::from(now));
            let mut calls = Vec::new();
            let mut cx = StubCx::new(&mut source, &mut calls);
            prop_assert_eq!(NondetTimer.set(&mut cx, clock, Ptr::Wild, offset), Ok(now));
            prop_assert!(NondetTimer.remove(&mut cx, clock, Ptr::Null).is_ok());
            prop_assert_eq!(NondetEventPoster.post(&mut cx, Ptr::Wild, clock), Ok(()));
            prop_assert_eq!(cx.calls().len(), 3);
        }

        #[test]
        fn any_sufficient_descriptor_length_is_safe(extra in 0u64..4096, timeout in any::<u32>()) {
            let len = EVENT_TIMEOUT_T.size as u64 + extra;
            let source = ScriptedSource::new()
                .with("event_timeout_len", len)
                .with("event_timeout_allocated", 1)
                .with("timeout", u64::from(timeout));
            let replay = Explorer::default().replay(&EventTimeoutSet::new(), source);
            prop_assert_eq!(replay.result, Ok(()));
            let allocation = replay.artifacts.heap.by_site("event_timeout").unwrap();
            prop_assert_eq!(allocation.len() as u64, len);
        }
    }

    #[test]
    fn stored_handler_is_a_pointer_value() {
        let replay = Explorer::default().replay(&UsbusRegisterEventHandler, usbus_scenario(false, false));
        let usbus = replay.artifacts.heap.by_site("usbus").map(|a| a.base()).unwrap();
        assert_eq!(
            replay.artifacts.heap.load(usbus, &USBUS_HANDLERS, "test"),
            Ok(Loaded::Value(Value::Pointer(Ptr::Null)))
        );
    }
}
