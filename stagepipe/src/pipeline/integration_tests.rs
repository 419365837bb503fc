//! End-to-end tests across sessions, history and wrappers.

#[cfg(test)]
mod tests {
    use crate::core::Flow;
    use crate::errors::PipelineError;
    use crate::history::UndoTarget;
    use crate::pipeline::{
        modal, EagerPipeline, LazyPipeline, Operation, Output, Pipeline, Wrapper,
    };
    use crate::stages::StageBuffer;
    use crate::testing::{
        assert_balanced, assert_history_len, assert_same_results, assert_sink_eq,
        assert_source_eq, init_tracing, numbers, pairs, PipelineFixture,
    };
    use mockall::automock;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::rc::Rc;

    #[automock]
    trait Doubler {
        fn double(&self, x: i32) -> i32;
        fn double_list(&self, xs: Vec<i32>) -> Vec<i32>;
    }

    fn run_chain<S: StageBuffer<i32>>(pipeline: &mut Pipeline<i32, S>) {
        pipeline.tap(Operation::named("inc", |x| x + 1));
        pipeline.map().unwrap();
        assert_balanced(pipeline);
        pipeline.filter(|x| x % 2 == 0);
        assert_balanced(pipeline);
        pipeline.append(vec![100]);
        assert_balanced(pipeline);
        pipeline.reverse();
        assert_balanced(pipeline);
        pipeline.first(3);
        assert_balanced(pipeline);
    }

    #[test]
    fn test_auto_balance_holds_after_every_call() {
        init_tracing();
        let fixture = PipelineFixture::new(numbers(8));

        let mut eager = fixture.eager().unwrap();
        run_chain(&mut eager);
        let mut lazy = fixture.lazy().unwrap();
        run_chain(&mut lazy);

        assert_sink_eq(&mut eager, &[100, 8, 6]);
        assert_same_results(&mut eager, &mut lazy);
    }

    #[test]
    fn test_manual_balance_needs_rebalance() {
        let mut pipeline = PipelineFixture::new(numbers(4)).manual().eager().unwrap();
        pipeline.filter(|x| *x > 2);

        assert!(!pipeline.balanced());
        assert_source_eq(&mut pipeline, &[1, 2, 3, 4]);

        pipeline.rebalance();
        assert_balanced(&mut pipeline);
        assert_source_eq(&mut pipeline, &[3, 4]);
    }

    #[test]
    fn test_undo_restores_previous_source() {
        init_tracing();
        let mut pipeline = EagerPipeline::new(numbers(5));
        let before = pipeline.source();

        pipeline.filter(|x| x % 2 == 1);
        assert_source_eq(&mut pipeline, &[1, 3, 5]);
        let middle = pipeline.source();

        pipeline.sort_by_key(|x| -x);
        assert_source_eq(&mut pipeline, &[5, 3, 1]);

        pipeline.undo().unwrap();
        assert_eq!(pipeline.source(), middle);
        pipeline.undo().unwrap();
        assert_eq!(pipeline.source(), before);
        assert_balanced(&mut pipeline);
    }

    #[test]
    fn test_undo_steps_back() {
        let mut pipeline = LazyPipeline::new(vec![1]);
        pipeline.append(vec![2]).append(vec![3]).append(vec![4]);
        assert_history_len(&pipeline, 3);

        pipeline.undo_to(UndoTarget::Steps(2)).unwrap();
        assert_source_eq(&mut pipeline, &[1, 2]);
        assert_history_len(&pipeline, 2);
    }

    #[test]
    fn test_failed_undo_changes_nothing() {
        let mut pipeline = EagerPipeline::new(vec![1, 2, 3]);
        let err = pipeline.undo().map(|_| ()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyHistory(_)));
        assert_source_eq(&mut pipeline, &[1, 2, 3]);

        pipeline.reverse();
        let err = pipeline
            .undo_to(UndoTarget::Steps(4))
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.code(), "HISTORY-EMPTY");
        assert_source_eq(&mut pipeline, &[3, 2, 1]);
        assert_history_len(&pipeline, 1);
    }

    #[test]
    fn test_origin_survives_eviction() {
        let mut pipeline = PipelineFixture::new(numbers(3))
            .with_history_capacity(2)
            .lazy()
            .unwrap();
        for _ in 0..6 {
            pipeline.append(vec![0]);
        }
        assert_history_len(&pipeline, 2);

        pipeline.undo_to(UndoTarget::Origin).unwrap();
        assert_source_eq(&mut pipeline, &[1, 2, 3]);
        assert_sink_eq(&mut pipeline, &[1, 2, 3]);
        assert_history_len(&pipeline, 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut pipeline = EagerPipeline::new(numbers(2));
        for k in 1..=8 {
            pipeline.reverse();
            assert_history_len(&pipeline, k.min(5));
        }
    }

    #[test]
    fn test_snapshots_can_be_disabled() {
        let mut pipeline = PipelineFixture::new(numbers(2))
            .with_config(crate::pipeline::PipelineConfig::new().with_snapshots(false))
            .eager()
            .unwrap();
        pipeline.reverse().reverse();
        assert_history_len(&pipeline, 0);
    }

    #[test]
    fn test_lazy_and_eager_agree() {
        let fixture = PipelineFixture::new(numbers(10));
        let mut eager = fixture.eager().unwrap();
        let mut lazy = fixture.lazy().unwrap();

        for pipeline in [&mut eager as &mut dyn Chainable, &mut lazy] {
            pipeline.run();
        }
        assert_same_results(&mut eager, &mut lazy);
        assert_eq!(eager.drain().unwrap(), lazy.drain().unwrap());
    }

    trait Chainable {
        fn run(&mut self);
    }

    impl<S: StageBuffer<i32>> Chainable for Pipeline<i32, S> {
        fn run(&mut self) {
            self.tap(Operation::named("square", |x| x * x))
                .map()
                .unwrap()
                .reject(|x| x % 3 == 0)
                .last(4)
                .sort();
        }
    }

    #[test]
    fn test_lazy_pipeline_survives_repeated_reads() {
        let mut pipeline = LazyPipeline::new(vec![1, 2, 3]);
        for _ in 0..20_000 {
            assert!(pipeline.balanced());
        }

        assert_eq!(pipeline.source(), vec![1, 2, 3]);
        assert_eq!(pipeline.drain().unwrap().into_vec(), vec![1, 2, 3]);
        assert_sink_eq(&mut pipeline, &[1, 2, 3]);
    }

    #[test]
    fn test_long_lazy_chain_matches_eager() {
        let fixture = PipelineFixture::new(numbers(6));
        let mut eager = fixture.eager().unwrap();
        let mut lazy = fixture.lazy().unwrap();

        for step in 0..60 {
            eager.rework(|x| x + 1);
            lazy.rework(|x| x + 1);
            if step % 15 == 0 {
                eager.reverse();
                lazy.reverse();
            }
            assert_balanced(&mut lazy);
        }

        assert_same_results(&mut eager, &mut lazy);
        assert_sink_eq(&mut lazy, &[61, 62, 63, 64, 65, 66]);
    }

    #[test]
    fn test_one_mode_calls_whole_once() {
        let mut mock = MockDoubler::new();
        mock.expect_double_list()
            .times(1)
            .returning(|xs| xs.into_iter().map(|x| x * 2).collect());
        mock.expect_double().never();
        let mock = Rc::new(mock);
        let whole = Rc::clone(&mock);
        let each = Rc::clone(&mock);

        let mut pipeline = EagerPipeline::new(vec![1, 2, 3]);
        pipeline.one().expand(modal(
            move |all: Vec<i32>| whole.double_list(all),
            move |item: i32| vec![each.double(item)],
        ));

        assert_sink_eq(&mut pipeline, &[2, 4, 6]);
    }

    #[test]
    fn test_many_mode_calls_each_per_item() {
        let mut mock = MockDoubler::new();
        mock.expect_double().times(3).returning(|x| x * 2);
        mock.expect_double_list().never();
        let mock = Rc::new(mock);
        let whole = Rc::clone(&mock);
        let each = Rc::clone(&mock);

        let mut pipeline = LazyPipeline::new(vec![1, 2, 3]);
        pipeline.apply(modal(
            move |all: Vec<i32>| whole.double_list(all).into_iter().sum::<i32>(),
            move |item: i32| each.double(item),
        ));

        assert_sink_eq(&mut pipeline, &[2, 4, 6]);
        assert_source_eq(&mut pipeline, &[2, 4, 6]);
        assert_sink_eq(&mut pipeline, &[2, 4, 6]);
    }

    #[test]
    fn test_first_and_last_scenario() {
        let mut pipeline = EagerPipeline::new(vec![5, 4, 3, 2, 1]);
        assert_eq!(pipeline.first(2).drain().unwrap().into_vec(), vec![5, 4]);

        let mut pipeline = EagerPipeline::new(vec![5, 4, 3, 2, 1]);
        assert_eq!(pipeline.last(2).drain().unwrap().into_vec(), vec![2, 1]);
    }

    #[test]
    fn test_mapping_wrapper() {
        let mut pipeline = EagerPipeline::new(pairs());
        pipeline.one().chain(Flow::FourStep, |_| {});
        pipeline.wrap(Wrapper::mapping());

        assert_eq!(
            pipeline.peek().unwrap(),
            Output::Scalar(json!({"a": 1, "b": 2, "c": 3}))
        );

        pipeline.unwrap();
        assert_eq!(pipeline.wrapper().name(), "list");
        assert_eq!(pipeline.drain().unwrap().len(), 3);
    }

    #[test]
    fn test_incompatible_wrap_keeps_state() {
        let mut pipeline = EagerPipeline::new(vec![json!(1), json!(2)]);
        pipeline.one().reverse().wrap(Wrapper::mapping());

        let err = pipeline.drain().unwrap_err();
        assert!(matches!(err, PipelineError::IncompatibleWrap(_)));
        assert_sink_eq(&mut pipeline, &[json!(2), json!(1)]);
    }

    #[test]
    fn test_set_wrapper_per_mode() {
        let mut pipeline = EagerPipeline::new(vec![3, 1, 3, 2, 1]);
        pipeline.chain(Flow::FourStep, |_| {}).wrap(Wrapper::set());
        assert_eq!(pipeline.peek().unwrap().into_vec(), vec![3, 1, 3, 2, 1]);

        pipeline.one();
        assert_eq!(pipeline.peek().unwrap().into_vec(), vec![3, 1, 2]);
    }
}
