use flagpole::{
    field, Context, ContextFieldDefinition, FieldType, Flag, Operator, Snapshot, Value,
};

fn main() {
    // Deny-before-allow: strategies are checked in declaration order and the
    // first match wins.
    let snapshot = Snapshot::builder()
        .field(ContextFieldDefinition::new("tags", FieldType::Array))
        .field(ContextFieldDefinition::new("userLevel", FieldType::Number))
        .build()
        .expect("failed to build snapshot");

    let flag = Flag::builder("premium_lounge")
        .strategy("banned", false, |s| {
            s.when(field("tags").is_any(Operator::ArrAny, ["banned"]))
        })
        .strategy("eligible", true, |s| {
            s.when(field("userLevel").is(Operator::NumGte, 30))
        })
        .build();

    // Banned user: deny wins despite being eligible
    let ctx = Context::new()
        .set("tags", Value::array(["banned", "vip"]))
        .set("userLevel", 80_i64);
    println!("Banned user: {}", snapshot.evaluate_flag(&flag, &ctx));

    // Normal user: allowed
    let ctx = Context::new()
        .set("tags", Value::array(["vip"]))
        .set("userLevel", 80_i64);
    println!("Normal user: {}", snapshot.evaluate_flag(&flag, &ctx));

    // Newcomer: no strategy matches
    let ctx = Context::new().set("userLevel", 3_i64);
    println!("Newcomer: {}", snapshot.evaluate_flag(&flag, &ctx));
}
