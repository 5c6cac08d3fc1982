//! Expression evaluation and dispatch benchmarks.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quest_rules::core::{FixedRandom, ValueStore, VariableStore};
use quest_rules::events::{ActionContext, Event, EventAction, EventEngine};
use quest_rules::expr::evaluate;

fn bench_expressions(c: &mut Criterion) {
    let mut store = VariableStore::new();
    store.set_var("year", 4.0);
    store.set_var("player.hope", 62.0);
    store.add_item("idea", 3);
    store.add_status("inspired");

    let mut group = c.benchmark_group("expression");

    group.bench_function("arithmetic", |b| {
        let mut rng = FixedRandom(0.5);
        b.iter(|| evaluate(black_box("(2 + 3) * 4 - 10 / 3 % 2"), &store, &mut rng))
    });

    group.bench_function("condition", |b| {
        let mut rng = FixedRandom(0.5);
        let condition = "year >= 3 && itemCount('idea') > 2 && !hasStatus('exhausted') \
                         || clip(player.hope, 0, 100) === 62";
        b.iter(|| evaluate(black_box(condition), &store, &mut rng))
    });

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut engine = EventEngine::new(VariableStore::new(), FixedRandom(0.5));
    engine.register_action_fn("Add", |_: &EventAction, ctx: &mut ActionContext<'_>| {
        ctx.store_mut().add_var("counter", 1.0);
    });
    for i in 0..32 {
        let event = Event::new(format!("E{i}"), "Tick")
            .with_condition(format!("counter % 32 !== {i}"))
            .with_action(EventAction::new("Add"));
        engine.register_event(event).ok();
    }

    c.bench_function("dispatch_32_events", |b| {
        b.iter(|| {
            engine.trigger("Tick", 1.0, 0).ok();
            black_box(engine.process_next_trigger())
        })
    });
}

criterion_group!(benches, bench_expressions, bench_dispatch);
criterion_main!(benches);
