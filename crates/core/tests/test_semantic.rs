//! Tests for the semantic model: selection, binding, references, type
//! hierarchies, and concrete-type resolution.

use varsight_core::semantic::SymbolKind;
use varsight_core::{SemanticModel, Workspace};

fn model_of(source: &str) -> SemanticModel {
    let workspace = Workspace::from_sources(&[("Test.cs", source)]).expect("parse source");
    SemanticModel::build(workspace)
}

fn file(model: &SemanticModel) -> varsight_core::FileId {
    model.workspace().file_ids().next().unwrap()
}

fn offset_of(source: &str, needle: &str) -> usize {
    source.find(needle).expect("needle not found")
}

#[test]
fn test_symbol_at_declaration_and_usage() {
    let source = r#"
class Program {
    static void Main() {
        int value = 1;
        int doubled = value * 2;
    }
}
"#;
    let model = model_of(source);
    let f = file(&model);

    let at_decl = model
        .symbol_at(f, offset_of(source, "value = 1"))
        .expect("declaration binds");
    let at_use = model
        .symbol_at(f, offset_of(source, "value * 2"))
        .expect("usage binds");

    assert_eq!(at_decl, at_use);
    assert_eq!(model.symbol(at_decl).kind(), SymbolKind::Local);
    assert_eq!(model.symbol(at_decl).name(), "value");
}

#[test]
fn test_references_include_declaration_and_uses() {
    let source = r#"
class Program {
    static void Main() {
        int x = 1;
        x = x + 1;
        x = x * 2;
    }
}
"#;
    let model = model_of(source);
    let f = file(&model);
    let x = model.symbol_at(f, offset_of(source, "x = 1")).unwrap();

    // declaration name + two LHS + two RHS occurrences
    assert_eq!(model.references(x).len(), 5);
}

#[test]
fn test_member_binding_through_receiver_type() {
    let source = r#"
class Person {
    public string Name { get; set; }
}

class Program {
    static void Main() {
        Person p = new Person();
        string n = p.Name;
    }
}
"#;
    let model = model_of(source);
    let f = file(&model);

    let bound = model
        .symbol_at(f, offset_of(source, "Name;"))
        .expect("member access binds");
    assert_eq!(model.symbol(bound).kind(), SymbolKind::Property);
    assert_eq!(model.display_string(bound), "Person.Name");
}

#[test]
fn test_static_member_binding_through_type_name() {
    let source = r#"
class Config {
    public static int Limit() { return 10; }
}

class Program {
    static void Main() {
        int max = Config.Limit();
    }
}
"#;
    let model = model_of(source);
    let f = file(&model);

    let bound = model
        .symbol_at(f, offset_of(source, "Limit();"))
        .expect("static member binds");
    assert_eq!(model.symbol(bound).kind(), SymbolKind::Method);
    assert!(model.symbol(bound).is_static());
}

#[test]
fn test_derivation_and_override_chain() {
    let source = r#"
class Shape {
    public virtual double GetArea() { return 0; }
}

class Rectangle : Shape {
    public override double GetArea() { return 1; }
}

class Square : Rectangle {
    public override double GetArea() { return 2; }
}
"#;
    let model = model_of(source);
    let table = model.table();

    let shape = table.type_by_name("Shape").unwrap();
    let rectangle = table.type_by_name("Rectangle").unwrap();
    let square = table.type_by_name("Square").unwrap();

    assert!(model.derives_from(rectangle, shape));
    assert!(model.derives_from(square, shape), "derivation is transitive");
    assert!(!model.derives_from(shape, shape), "derivation is strict");

    let base_method = model.lookup_method(shape, "GetArea").unwrap();
    let square_method = model.lookup_method(square, "GetArea").unwrap();
    assert_eq!(model.override_base(square_method), base_method);
}

#[test]
fn test_member_lookup_walks_base_chain() {
    let source = r#"
class Base {
    public int Shared;
}

class Derived : Base {
    public int Own;
}
"#;
    let model = model_of(source);
    let derived = model.table().type_by_name("Derived").unwrap();

    let inherited = model.lookup_member(derived, "Shared").expect("inherited");
    assert_eq!(model.display_string(inherited), "Base.Shared");
}

#[test]
fn test_concrete_type_prefers_object_creation() {
    let source = r#"
class Shape { }
class Rectangle : Shape { }

class Program {
    static void Main() {
        Shape constructed = new Rectangle();
        Shape declared_only;
    }
}
"#;
    let model = model_of(source);
    let f = file(&model);

    let constructed = model
        .symbol_at(f, offset_of(source, "constructed"))
        .unwrap();
    let declared = model
        .symbol_at(f, offset_of(source, "declared_only"))
        .unwrap();

    let rectangle = model.table().type_by_name("Rectangle").unwrap();
    let shape = model.table().type_by_name("Shape").unwrap();
    assert_eq!(
        model.concrete_type_at_declaration(constructed),
        Some(rectangle)
    );
    assert_eq!(model.concrete_type_at_declaration(declared), Some(shape));
}

#[test]
fn test_var_infers_from_object_creation() {
    let source = r#"
class Person { }

class Program {
    static void Main() {
        var p = new Person();
    }
}
"#;
    let model = model_of(source);
    let f = file(&model);

    let p = model.symbol_at(f, offset_of(source, "p =")).unwrap();
    let person = model.table().type_by_name("Person").unwrap();
    assert_eq!(model.declared_type_of(p), Some(person));
}

#[test]
fn test_top_level_statements_bind_locals() {
    let source = r#"int seed = 2;
int result = Compute(seed);

static int Compute(int input) {
    return input * 2;
}
"#;
    let model = model_of(source);
    let f = file(&model);

    let seed = model.symbol_at(f, offset_of(source, "seed = 2")).unwrap();
    assert_eq!(model.symbol(seed).kind(), SymbolKind::Local);

    let compute = model
        .symbol_at(f, offset_of(source, "Compute(seed)"))
        .unwrap();
    assert_eq!(model.symbol(compute).kind(), SymbolKind::Method);

    let input = model.symbol_at(f, offset_of(source, "input * 2")).unwrap();
    assert_eq!(model.symbol(input).kind(), SymbolKind::Parameter);
}

#[test]
fn test_location_string_uses_basename_and_line() {
    let source = "class C {\n    int counter = 0;\n}";
    let workspace = Workspace::from_sources(&[("src/Deep/File.cs", source)]).unwrap();
    let model = SemanticModel::build(workspace);
    let f = model.workspace().file_ids().next().unwrap();

    let counter = model.symbol_at(f, source.find("counter").unwrap()).unwrap();
    let location = model.location(counter);
    assert_eq!(model.location_string(&location), "File.cs:2");
    assert_eq!(model.source_line(&location), "int counter = 0;");
}

#[test]
fn test_type_identifiers_do_not_bind() {
    let source = r#"
class Shape { }

class Program {
    static void Main() {
        Shape s = null;
    }
}
"#;
    let model = model_of(source);
    let f = file(&model);

    // `Shape` in the declaration's type position names a type, not a symbol
    assert!(model.symbol_at(f, offset_of(source, "Shape s")).is_none());
}
