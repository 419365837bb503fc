//! Test assertions for pipeline state.

use crate::pipeline::{EagerPipeline, LazyPipeline, Pipeline};
use crate::stages::StageBuffer;
use std::fmt::Debug;

/// Asserts that source and sink hold the same number of items.
pub fn assert_balanced<T, S>(pipeline: &mut Pipeline<T, S>)
where
    T: Clone + Debug + 'static,
    S: StageBuffer<T>,
{
    let source = pipeline.source();
    let sink = pipeline.sink();
    assert!(
        source.len() == sink.len(),
        "Expected a balanced pipeline, source: {:?}, sink: {:?}",
        source,
        sink
    );
}

/// Asserts the source contents.
pub fn assert_source_eq<T, S>(pipeline: &mut Pipeline<T, S>, expected: &[T])
where
    T: Clone + Debug + PartialEq + 'static,
    S: StageBuffer<T>,
{
    let actual = pipeline.source();
    assert_eq!(
        actual, expected,
        "Expected source {:?}, got {:?}",
        expected, actual
    );
}

/// Asserts the sink contents.
pub fn assert_sink_eq<T, S>(pipeline: &mut Pipeline<T, S>, expected: &[T])
where
    T: Clone + Debug + PartialEq + 'static,
    S: StageBuffer<T>,
{
    let actual = pipeline.sink();
    assert_eq!(
        actual, expected,
        "Expected sink {:?}, got {:?}",
        expected, actual
    );
}

/// Asserts the number of retained snapshots.
pub fn assert_history_len<T, S>(pipeline: &Pipeline<T, S>, expected: usize)
where
    T: Clone + 'static,
    S: StageBuffer<T>,
{
    assert_eq!(
        pipeline.history_len(),
        expected,
        "Expected {} snapshots, got {}",
        expected,
        pipeline.history_len()
    );
}

/// Asserts that an eager and a lazy pipeline ended with the same sink.
pub fn assert_same_results<T>(eager: &mut EagerPipeline<T>, lazy: &mut LazyPipeline<T>)
where
    T: Clone + Debug + PartialEq + 'static,
{
    let eager_sink = eager.sink();
    let lazy_sink = lazy.sink();
    assert_eq!(
        eager_sink, lazy_sink,
        "Eager sink {:?} differs from lazy sink {:?}",
        eager_sink, lazy_sink
    );
}
