use test_log::test;

use notaza::{
    codec::outline::{parse, serialize},
    editor::{EditOutcome, NoChange, OutlineEditor},
    properties::{Block, BlockId, PageId},
    refresh::{load_page, save_page},
    store::FsPageStore,
};

mod common;
use common::{generate_test_root, read_page};

const OUTLINE: &str = "* one\n    * one.a\n    * one.b\n        * one.b.i\n* two\n  second line\n* three\n    * three.a";

fn all_ids(root: &Block) -> Vec<BlockId> {
    root.descendants().map(|(block, _)| block.id).collect()
}

#[test]
fn indent_then_unindent_restores_every_block() {
    let root = parse(OUTLINE).unwrap();
    for id in all_ids(&root) {
        let mut editor = OutlineEditor::new(root.clone());
        let outcome = editor.indent_block(id).unwrap();
        if outcome == EditOutcome::Unchanged(NoChange::AtBoundary) {
            continue;
        }
        editor.unindent_block(id).unwrap();
        assert_eq!(serialize(editor.root()), OUTLINE);
    }
}

#[test]
fn split_then_merge_restores_every_block() {
    let root = parse(OUTLINE).unwrap();
    for id in all_ids(&root) {
        let content = root.find(id).unwrap().content.clone();
        let cut = content.len() / 2;
        let (before, after) = content.split_at(cut);

        let mut editor = OutlineEditor::new(root.clone());
        let focus = editor.split_block(id, before, after).unwrap().focus().unwrap();
        assert_eq!(focus.caret, Some(0));
        let merged = editor.merge_with_predecessor(focus.block, after).unwrap();
        assert_eq!(merged.focus().and_then(|f| f.caret), Some(cut));
        assert_eq!(serialize(editor.root()), OUTLINE);
        assert_eq!(editor.find(id).unwrap().content, content);
    }
}

#[test]
fn move_up_then_down_restores_order() {
    let root = parse(OUTLINE).unwrap();
    for id in all_ids(&root) {
        let mut editor = OutlineEditor::new(root.clone());
        if editor.move_up(id).unwrap().is_changed() {
            editor.move_down(id).unwrap();
        }
        assert_eq!(serialize(editor.root()), OUTLINE);
    }
}

#[test]
fn failed_edits_leave_the_tree_alone() {
    let root = parse(OUTLINE).unwrap();
    let mut editor = OutlineEditor::new(root.clone());
    assert!(editor.indent_block(BlockId::new()).is_err());
    assert!(editor.remove_block(BlockId::new()).is_err());
    assert_eq!(editor.root(), &root);
    assert!(!editor.can_undo());
}

#[test]
fn edited_page_saves_to_disk() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = generate_test_root("notebook_1")?;
    let store = FsPageStore::new(tempdir.path(), "md");
    let mut page = load_page(&store, &PageId::from("topics/gardening"))?;

    let mut editor = OutlineEditor::new(page.body.clone());
    let herbs = editor.root().children[1].id;
    editor.move_up(herbs)?;
    editor.split_block(herbs, "Herbs", "basil")?;
    page.set_body(editor.into_root());
    save_page(&store, &page)?;

    assert_eq!(
        read_page(tempdir.path(), "topics/gardening.md"),
        "---\ntitle: Gardening\ntags: [outdoor]\n---\n* Herbs\n* basil\n* Tomatoes\n"
    );
    Ok(())
}

#[test]
fn new_page_starts_empty_and_saves() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = generate_test_root("notebook_1")?;
    let store = FsPageStore::new(tempdir.path(), "md");
    let mut page = load_page(&store, &PageId::from("ideas/new"))?;
    assert!(page.body.is_leaf());

    let mut editor = OutlineEditor::new(page.body.clone());
    let root_id = editor.root().id;
    editor.append_child(root_id, "first thought")?;
    page.set_body(editor.into_root());
    save_page(&store, &page)?;
    assert_eq!(read_page(tempdir.path(), "ideas/new.md"), "* first thought\n");
    Ok(())
}
