use card_workbook::*;
use tempfile::TempDir;

const SHEET: &str = "\
Unit,Cost,Power
Goblin,1,2
Troll,3,5
,,
Phases,,Start,Draw,Play,,End
,,
,Setup
,Deal
,Shuffle
,,
";

fn sheet() -> Workbook {
    Workbook::from_reader(SHEET.as_bytes()).unwrap()
}

fn cell(name: &str) -> CellRef {
    name.parse().unwrap()
}

#[test]
fn test_load_from_reader() {
    let wb = sheet();
    assert_eq!(wb.max_row(), 10);
    assert_eq!(wb.max_column(), 7);
    assert_eq!(wb.get(cell("B3")), Some("3"));
    assert_eq!(wb.get(cell("B4")), None);
    assert_eq!(wb.get(cell("Z99")), None);
}

#[test]
fn test_cells_start_at_one() {
    let wb = sheet();
    assert_eq!(wb.get(CellRef::new(1, 1).unwrap()), Some("Unit"));
    assert!(matches!(
        CellRef::new(0, 1),
        Err(WorkbookError::InvalidCoordinate(_))
    ));
    assert!(matches!(
        CellRef::new(1, 0),
        Err(WorkbookError::InvalidCoordinate(_))
    ));
    assert!("A0".parse::<CellRef>().is_err());
}

#[test]
fn test_find() {
    let wb = sheet();
    assert_eq!(wb.find("Troll", 100, 100).unwrap(), cell("A3"));
    assert_eq!(wb.find("Power", 100, 100).unwrap(), cell("C1"));
    assert!(matches!(
        wb.find("Power", 2, 100),
        Err(WorkbookError::NotFound(_))
    ));
    assert!(wb.find("Dragon", 100, 100).is_err());
}

#[test]
fn test_find_value_beside() {
    let wb = sheet();
    assert_eq!(wb.find_value_beside("Goblin", 100, 100).unwrap(), Some("1"));
    assert_eq!(wb.find_value_beside("Phases", 100, 100).unwrap(), None);
}

#[test]
fn test_values_below() {
    let wb = sheet();
    assert_eq!(wb.find_non_blank_below(cell("B4")).unwrap(), cell("B7"));
    assert_eq!(
        wb.find_values_below(cell("B4")).unwrap(),
        vec!["Setup", "Deal", "Shuffle"]
    );
    assert_eq!(wb.find_values_below(cell("B1")).unwrap(), vec!["1", "3"]);

    match wb.find_values_below(cell("H1")) {
        Err(WorkbookError::NotFound(msg)) => assert!(msg.contains("H1")),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_values_beside() {
    let wb = sheet();
    assert_eq!(
        wb.find_values_beside(cell("A5")).unwrap(),
        vec!["Start", "Draw", "Play"]
    );
    assert!(wb.find_values_beside(cell("A4")).is_err());
}

#[test]
fn test_put_values() {
    let mut wb = sheet();
    wb.put_values_below(cell("A10"), ["x", "y"]);
    assert_eq!(wb.get(cell("A11")), Some("x"));
    assert_eq!(wb.find_values_below(cell("A10")).unwrap(), vec!["x", "y"]);

    wb.put_values_beside(cell("C12"), vec![String::from("p"), String::from("q")]);
    assert_eq!(wb.get(cell("E12")), Some("q"));
    assert_eq!(wb.max_row(), 12);
    assert_eq!(wb.find_values_beside(cell("C12")).unwrap(), vec!["p", "q"]);
}

#[test]
fn test_find_value_in_table() {
    let wb = sheet();
    let corner = cell("A1");
    assert_eq!(
        wb.find_value_in_table(corner, "Troll", "Power").unwrap(),
        Some("5")
    );
    assert_eq!(
        wb.find_value_in_table(corner, "Goblin", "Cost").unwrap(),
        Some("1")
    );
    match wb.find_value_in_table(corner, "Dragon", "Power") {
        Err(WorkbookError::NotFound(msg)) => assert!(msg.contains("Dragon")),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sheet.csv");

    let mut wb = sheet();
    wb.set(cell("D2"), "new, with comma");
    wb.save(&path).unwrap();

    let loaded = Workbook::load(&path).unwrap();
    assert_eq!(loaded.get(cell("D2")), Some("new, with comma"));
    assert_eq!(loaded.get(cell("G5")), Some("End"));
    assert_eq!(loaded.max_row(), wb.max_row());
    assert!(loaded.rows().iter().all(|row| row.len() == 7));

    assert!(matches!(
        Workbook::load(dir.path().join("missing.csv")),
        Err(WorkbookError::Io(_))
    ));
}

#[test]
fn test_load_card_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cards.csv");
    std::fs::write(
        &path,
        "title,body\nFireball,Deal 3 damage\nShield,\"Block, then draw\"\nLonely\n",
    )
    .unwrap();

    let cards = load_card_text(&path).unwrap();
    assert_eq!(
        cards,
        vec![
            CardText {
                title: "Fireball".into(),
                body: "Deal 3 damage".into()
            },
            CardText {
                title: "Shield".into(),
                body: "Block, then draw".into()
            },
        ]
    );
}
