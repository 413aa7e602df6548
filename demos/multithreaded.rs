use std::sync::Arc;
use std::thread;

use flagpole::{
    field, Context, ContextFieldDefinition, FieldType, Flag, Operator, Segment, Snapshot,
    SnapshotHandle,
};

fn catalog(min_level: i64) -> Snapshot {
    Snapshot::builder()
        .field(ContextFieldDefinition::new("country", FieldType::Country))
        .field(ContextFieldDefinition::new("userLevel", FieldType::Number))
        .segment(Segment::new(
            "veterans",
            [field("userLevel").is(Operator::NumGte, min_level)],
        ))
        .build()
        .expect("failed to build snapshot")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=flagpole=debug shows each flag decision
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flagpole=info".parse()?),
        )
        .init();

    let handle = Arc::new(SnapshotHandle::new(catalog(50)));
    let flag = Arc::new(
        Flag::builder("new_shop")
            .strategy("kr_veterans", "variant_b", |s| {
                s.segment("veterans")
                    .when(field("country").is(Operator::StrEq, "KR"))
            })
            .strategy("default", "variant_a", |s| s)
            .build(),
    );

    let workers: Vec<_> = (0..4_i64)
        .map(|i| {
            let handle = Arc::clone(&handle);
            let flag = Arc::clone(&flag);
            thread::spawn(move || {
                let ctx = Context::new()
                    .set("country", "KR")
                    .set("userLevel", 20 + i * 10);

                // One snapshot per request, no lock held while evaluating
                let snapshot = handle.load();
                let result = snapshot.evaluate_flag(&flag, &ctx);
                println!(
                    "Thread {i} (level {}) on v{}: {:?}",
                    20 + i * 10,
                    snapshot.version(),
                    result.payload()
                );
            })
        })
        .collect();

    for w in workers {
        w.join().expect("worker panicked");
    }

    // The admin lowers the veteran threshold; new requests see it at once
    let version = handle.publish(catalog(30));
    let ctx = Context::new().set("country", "KR").set("userLevel", 30_i64);
    let snapshot = handle.load();
    println!(
        "After publish v{version}: {:?}",
        snapshot.evaluate_flag(&flag, &ctx).payload()
    );

    Ok(())
}
