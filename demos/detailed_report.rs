use flagpole::{
    field, Context, ContextFieldDefinition, FieldType, Flag, Operator, Segment, Snapshot, Value,
};

fn main() {
    let snapshot = Snapshot::builder()
        .field(ContextFieldDefinition::new("country", FieldType::Country))
        .field(ContextFieldDefinition::new("userLevel", FieldType::Number))
        .field(ContextFieldDefinition::new("tags", FieldType::Array))
        .segment(Segment::new("veterans", [field("userLevel").is(Operator::NumGte, 50)]))
        .build()
        .expect("failed to build snapshot");

    let flag = Flag::builder("new_shop")
        .strategy("beta_testers", "variant_c", |s| {
            s.when(field("tags").is_any(Operator::ArrAny, ["beta"]))
                .when(field("appVersion").exists())
        })
        .strategy("ghost_segment", "variant_x", |s| s.segment("whales"))
        .strategy("kr_veterans", "variant_b", |s| {
            s.segment("veterans")
                .when(field("country").is(Operator::StrEq, "kr").ignore_case())
        })
        .strategy("default", "variant_a", |s| s)
        .build();

    let ctx = Context::new()
        .set("country", "KR")
        .set("userLevel", "seventy")
        .set("tags", Value::array(["beta", "test"]));

    let report = snapshot.evaluate_flag_detailed(&flag, &ctx);

    println!("{report}");
    println!();
    for (strategy, group) in flag.strategies.iter().zip(report.strategies()) {
        println!("{}: {}", strategy.name, group.result());
        if let Some(unresolved) = group.unresolved() {
            println!("  unsatisfiable: {unresolved}");
        }
        for (constraint, outcome) in group.outcomes() {
            println!("  {constraint} => {outcome}");
        }
    }
}
