use std::rc::Rc;

use pawx_clowder::{
    declare, Active, ClassBuilder, ClassDescriptor, ClowderError, MemberDef, MemberTable, Method,
    Registry, Value,
};
use rand::Rng;

fn queue() -> Rc<ClassDescriptor> {
    ClassBuilder::new("Queue")
        .private("queue", MemberDef::data(Vec::<Value>::new()))
        .public(
            "add",
            Method::with_arity(1, |frame, args| {
                let mut items = frame.get("queue")?.into_list().unwrap_or_default();
                items.extend(args);
                frame.assign("queue", items)?;
                Ok(Value::Object(frame.this()))
            }),
        )
        .public(
            "remove",
            Method::with_arity(0, |frame, _| {
                let mut items = frame.private().get("queue")?.into_list().unwrap_or_default();
                if items.is_empty() {
                    return Ok(Value::Null);
                }
                let head = items.remove(0);
                frame.private().set("queue", items)?;
                Ok(head)
            }),
        )
        .build()
        .unwrap()
}

fn counting_queue(parent: &Rc<ClassDescriptor>) -> Rc<ClassDescriptor> {
    ClassBuilder::new("CountingQueue")
        .inherit(parent)
        .private("total", MemberDef::data(0))
        .public(
            "add",
            Method::with_arity(1, |frame, args| {
                let total = frame.get("total")?.as_number().unwrap_or(0.0);
                frame.assign("total", total + 1.0)?;
                frame.super_call("add", args)
            }),
        )
        .public("get_total", MemberDef::method(|frame, _| frame.get("total")))
        .build()
        .unwrap()
}

#[test]
fn queue_hands_items_back_in_order() {
    let q = queue().new_instance(vec![]).unwrap();

    q.call("add", vec![Value::from(5)])
        .unwrap()
        .call("add", vec![Value::from(6)])
        .unwrap()
        .call("add", vec![Value::from("foo")])
        .unwrap();

    assert_eq!(q.call("remove", vec![]).unwrap(), Value::from(5));
    assert_eq!(q.call("remove", vec![]).unwrap(), Value::from(6));
    assert_eq!(q.call("remove", vec![]).unwrap(), Value::from("foo"));
    assert!(q.call("remove", vec![]).unwrap().is_null());
}

#[test]
fn counting_queue_counts_every_add() {
    let base = queue();
    let q = counting_queue(&base).new_instance(vec![]).unwrap();

    q.call("add", vec![Value::from(5)])
        .unwrap()
        .call("add", vec![Value::from(6)])
        .unwrap();
    assert_eq!(q.call("remove", vec![]).unwrap(), Value::from(5));

    assert_eq!(q.call("get_total", vec![]).unwrap(), Value::from(2));
    assert!(q.is_instance_of(&base));
}

#[test]
fn super_resolves_from_the_declaring_level() {
    let root = ClassBuilder::new("Root")
        .public("m", MemberDef::method(|_, _| Ok(Value::from("root"))))
        .build()
        .unwrap();
    let mid = ClassBuilder::new("Mid")
        .inherit(&root)
        .public(
            "m",
            MemberDef::method(|frame, _| {
                let above = frame.super_call("m", vec![])?;
                Ok(Value::from(format!("mid>{}", above.stringify())))
            }),
        )
        .build()
        .unwrap();
    let leaf = ClassBuilder::new("Leaf").inherit(&mid).build().unwrap();

    let obj = leaf.new_instance(vec![]).unwrap();
    assert_eq!(obj.call("m", vec![]).unwrap(), Value::from("mid>root"));
}

#[test]
fn leaf_override_calls_through_two_levels() {
    let root = ClassBuilder::new("Root")
        .public("m", MemberDef::method(|_, _| Ok(Value::from("root"))))
        .build()
        .unwrap();
    let mid = ClassBuilder::new("Mid")
        .inherit(&root)
        .public(
            "m",
            MemberDef::method(|frame, _| {
                let above = frame.super_call("m", vec![])?;
                Ok(Value::from(format!("mid>{}", above.stringify())))
            }),
        )
        .build()
        .unwrap();
    let leaf = ClassBuilder::new("Leaf")
        .inherit(&mid)
        .public(
            "m",
            MemberDef::method(|frame, _| {
                let above = frame.super_call("m", vec![])?;
                Ok(Value::from(format!("leaf>{}", above.stringify())))
            }),
        )
        .build()
        .unwrap();

    let obj = leaf.new_instance(vec![]).unwrap();
    assert_eq!(obj.call("m", vec![]).unwrap(), Value::from("leaf>mid>root"));
}

#[test]
fn initialize_super_reaches_the_immediate_parent() {
    let root = ClassBuilder::new("Root")
        .public("trail", MemberDef::data(""))
        .public(
            "initialize",
            MemberDef::method(|frame, _| {
                let trail = frame.get("trail")?.stringify();
                frame.assign("trail", format!("{}root", trail))?;
                Ok(Value::Null)
            }),
        )
        .build()
        .unwrap();
    let mid = ClassBuilder::new("Mid")
        .inherit(&root)
        .public(
            "initialize",
            MemberDef::method(|frame, args| {
                frame.assign("trail", "mid>")?;
                frame.super_call("initialize", args)
            }),
        )
        .build()
        .unwrap();
    let leaf = ClassBuilder::new("Leaf")
        .inherit(&mid)
        .public(
            "initialize",
            MemberDef::method(|frame, args| {
                frame.super_call("initialize", args)?;
                let trail = frame.get("trail")?.stringify();
                frame.assign("trail", format!("leaf>{}", trail))?;
                Ok(Value::Null)
            }),
        )
        .build()
        .unwrap();

    let obj = leaf.new_instance(vec![]).unwrap();
    assert_eq!(obj.get("trail").unwrap(), Value::from("leaf>mid>root"));
}

#[test]
fn private_slots_only_reachable_through_methods() {
    let class = ClassBuilder::new("Vault")
        .private("secret", MemberDef::data(42))
        .public("peek", MemberDef::method(|frame, _| frame.get("secret")))
        .build()
        .unwrap();
    let vault = class.new_instance(vec![]).unwrap();

    let err = vault.get("secret").unwrap_err();
    assert!(matches!(err, ClowderError::NoSuchMember { ref name, .. } if name == "secret"));
    assert_eq!(vault.call("peek", vec![]).unwrap(), Value::from(42));
}

#[test]
fn active_member_transforms_writes() {
    let class = ClassBuilder::new("Numbers")
        .public("x", MemberDef::data(100))
        .active(
            "x2",
            Active::new(|frame, value| match value {
                None => Ok(Value::from(frame.get("x")?.as_number().unwrap_or(0.0) * 2.0)),
                Some(v) => {
                    frame.assign("x", v.as_number().unwrap_or(0.0) / 2.0)?;
                    Ok(Value::Null)
                }
            }),
        )
        .build()
        .unwrap();
    let n = class.new_instance(vec![]).unwrap();

    assert_eq!(n.get("x2").unwrap(), Value::from(200));
    n.set("x2", 1000).unwrap();
    assert_eq!(n.get("x").unwrap(), Value::from(500));
    assert_eq!(n.get("x2").unwrap(), Value::from(1000));
}

#[test]
fn read_only_active_member_rejects_writes() {
    let class = ClassBuilder::new("Dice")
        .active(
            "roll",
            Active::getter(|_| Ok(Value::from(rand::thread_rng().gen_range(1..=6_i32)))),
        )
        .build()
        .unwrap();
    let dice = class.new_instance(vec![]).unwrap();

    for _ in 0..10 {
        let roll = dice.get("roll").unwrap().as_number().unwrap();
        assert!((1.0..=6.0).contains(&roll));
    }

    let err = dice.set("roll", 3).unwrap_err();
    assert!(matches!(err, ClowderError::NotWritable { ref name, .. } if name == "roll"));
}

#[test]
fn chained_calls_match_sequential_calls() {
    let class = queue();
    let chained = class.new_instance(vec![]).unwrap();
    let sequential = class.new_instance(vec![]).unwrap();

    chained
        .call("add", vec![Value::from(1)])
        .unwrap()
        .call("add", vec![Value::from(2)])
        .unwrap();
    sequential.call("add", vec![Value::from(1)]).unwrap();
    sequential.call("add", vec![Value::from(2)]).unwrap();

    for _ in 0..3 {
        assert_eq!(
            chained.call("remove", vec![]).unwrap(),
            sequential.call("remove", vec![]).unwrap()
        );
    }
}

#[test]
fn instances_have_independent_storage() {
    let mut registry = Registry::new();
    let base = queue();
    registry
        .declare(
            registry
                .builder("Pair")
                .inherit(&base)
                .public("label", MemberDef::data("none"))
                .public(
                    "initialize",
                    MemberDef::method(|frame, args| {
                        let label = args.into_iter().next().unwrap_or(Value::Null);
                        frame.assign("label", label)?;
                        Ok(Value::Null)
                    }),
                ),
        )
        .unwrap();

    let a = registry.new_instance("Pair", vec![Value::from("a")]).unwrap();
    let b = registry.new_instance("Pair", vec![Value::from("b")]).unwrap();

    a.set("label", "changed").unwrap();
    a.call("add", vec![Value::from(1)]).unwrap();

    assert_eq!(b.get("label").unwrap(), Value::from("b"));
    assert!(b.call("remove", vec![]).unwrap().is_null());
    assert_eq!(a.call("remove", vec![]).unwrap(), Value::from(1));
}

#[test]
fn duplicate_names_produce_no_class() {
    let mut public = MemberTable::default();
    public.insert("size", MemberDef::data(0));
    let mut private = MemberTable::default();
    private.insert("size", MemberDef::data(1));

    let result = declare("Box", &public, &private, &MemberTable::default(), None);
    assert!(matches!(result, Err(ClowderError::DuplicateMember { ref name, .. }) if name == "size"));

    let mut registry = Registry::new();
    let err = registry
        .declare(
            registry
                .builder("Box")
                .public("size", MemberDef::data(0))
                .active("size", Active::getter(|_| Ok(Value::Null))),
        )
        .unwrap_err();
    assert_eq!(err.code(), "E_DUPLICATE_MEMBER");
    assert!(registry.get("Box").is_none());
}

#[test]
fn mutation_is_visible_through_every_path() {
    let class = ClassBuilder::new("Slot")
        .public("value", MemberDef::data(0))
        .public(
            "via_assign",
            MemberDef::method(|frame, args| {
                frame.assign("value", args.into_iter().next().unwrap_or(Value::Null))?;
                Ok(Value::Null)
            }),
        )
        .public(
            "via_self",
            MemberDef::method(|frame, args| {
                frame.this().set("value", args.into_iter().next().unwrap_or(Value::Null))?;
                Ok(Value::Null)
            }),
        )
        .public("read", MemberDef::method(|frame, _| frame.get("value")))
        .build()
        .unwrap();
    let slot = class.new_instance(vec![]).unwrap();

    slot.call("via_assign", vec![Value::from(1)]).unwrap();
    assert_eq!(slot.get("value").unwrap(), Value::from(1));

    slot.call("via_self", vec![Value::from(2)]).unwrap();
    assert_eq!(slot.call("read", vec![]).unwrap(), Value::from(2));

    slot.set("value", 3).unwrap();
    assert_eq!(slot.call("read", vec![]).unwrap(), Value::from(3));
}
