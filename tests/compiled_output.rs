//! Generated script for the slot example

use component_slots::Compiler;

#[test]
fn title_and_default_slot_script() {
    let source = "mixin foobar(obj)\n  slot title\n  article(data-attr=obj.a): slot\n+foobar({a: 5})\n  slot title\n    | Title\n  | Content\n";
    let output = Compiler::with_defaults().compile(source).unwrap();

    insta::assert_snapshot!(output.code(), @r###"
    firstMixin = component_slots::first_defined;
    firstComponent = firstMixin;
    fragment "foobar"(obj) {
      if component_slots::slot("title", defined_vars()) {
      }
      echo "<article data-attr=\"";
      echo escape(obj.a);
      echo "\">";
      if component_slots::slot("__main__", defined_vars()) {
      }
      echo "</article>";
    }
    {
      component_slot = null;
      call "foobar"({a: 5}) {
        if component_slots::slot("title", defined_vars()) {
          echo "Title";
        }
        if component_slot == null || component_slot == "__main__" {
          component_slot___main__ && component_slot___main__();
          echo "Content";
        }
      }
    }
    "###);
}

#[test]
fn compiled_script_is_stable_across_compilers() {
    let source = "mixin a\n  block\n+a\n  | x\n";
    let first = Compiler::with_defaults().compile(source).unwrap();
    let second = Compiler::with_defaults().compile(source).unwrap();
    assert_eq!(first, second);
}
