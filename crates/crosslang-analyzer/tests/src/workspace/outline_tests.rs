use super::*;

const GO_SOURCE: &str = r#"package api

// Service handles users.
type Service interface {
	Run(ctx context.Context) error
	Stop()
}

type Point struct {
	X, Y  int
	Label string `json:"label"`
}

type ID = string

const (
	First  ID = "a"
	Second ID = "b" // trailing
)

var Default = Point{X: 1}

func (p *Point) Move(dx int) {
	p.X += dx
}

func New() *Point {
	return &Point{}
}
"#;

const TS_SOURCE: &str = r#"/*
 * Users API.
 */
export interface User {
  readonly id: string;
  email?: string;
  greet(name: string): string;
}

export class UserStore implements Repo {
  private readonly cache: Map<string, User> = new Map();
  constructor(private api: Api) {}
  static async load(id: string): Promise<User> {
    return { id, email: "}" };
  }
}

export type UserDTO = {
  id: string;
};

export const fetchUser = async (id: string) => {
  return id;
};

let counter = 0;
export const Limit = 10;
"#;

fn summary(symbols: &[DocumentSymbol]) -> Vec<(&str, SymbolKind)> {
    symbols.iter().map(|symbol| (symbol.name.as_str(), symbol.kind)).collect()
}

fn children(symbol: &DocumentSymbol) -> Vec<(&str, SymbolKind)> {
    summary(symbol.children.as_deref().unwrap_or_default())
}

fn range(
    start: (u32, u32),
    end: (u32, u32),
) -> lsp_types::Range {
    lsp_types::Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1))
}

#[test]
fn go_top_level_declarations() {
    let symbols = outline(Language::Go, GO_SOURCE);
    assert_eq!(
        summary(&symbols),
        vec![
            ("Service", SymbolKind::INTERFACE),
            ("Point", SymbolKind::STRUCT),
            ("ID", SymbolKind::TYPE_PARAMETER),
            ("First", SymbolKind::CONSTANT),
            ("Second", SymbolKind::CONSTANT),
            ("Default", SymbolKind::VARIABLE),
            ("Move", SymbolKind::METHOD),
            ("New", SymbolKind::FUNCTION),
        ]
    );
}

#[test]
fn go_members_nest_under_their_type() {
    let symbols = outline(Language::Go, GO_SOURCE);
    assert_eq!(children(&symbols[0]), vec![("Run", SymbolKind::METHOD), ("Stop", SymbolKind::METHOD)]);
    assert_eq!(
        children(&symbols[1]),
        vec![("X", SymbolKind::FIELD), ("Y", SymbolKind::FIELD), ("Label", SymbolKind::FIELD)]
    );

    let fields = symbols[1].children.as_ref().unwrap();
    assert_eq!(fields[0].selection_range, range((9, 1), (9, 2)));
    assert_eq!(fields[1].selection_range, range((9, 4), (9, 5)));
}

#[test]
fn go_ranges_cover_the_whole_declaration() {
    let symbols = outline(Language::Go, GO_SOURCE);
    assert_eq!(symbols[0].range, range((3, 0), (6, 1)));
    assert_eq!(symbols[0].selection_range, range((3, 5), (3, 12)));
    assert_eq!(symbols[3].range, range((16, 1), (16, 16)));
    assert_eq!(symbols[6].range, range((22, 0), (24, 1)));
}

#[test]
fn go_methods_record_their_receiver() {
    let symbols = outline(Language::Go, GO_SOURCE);
    assert_eq!(symbols[6].detail.as_deref(), Some("Point"));
    assert_eq!(symbols[7].detail, None);
}

#[test]
fn typescript_top_level_declarations() {
    let symbols = outline(Language::TypeScript, TS_SOURCE);
    assert_eq!(
        summary(&symbols),
        vec![
            ("User", SymbolKind::INTERFACE),
            ("UserStore", SymbolKind::CLASS),
            ("UserDTO", SymbolKind::TYPE_PARAMETER),
            ("fetchUser", SymbolKind::FUNCTION),
            ("counter", SymbolKind::VARIABLE),
            ("Limit", SymbolKind::CONSTANT),
        ]
    );
    assert_eq!(symbols[2].range, range((17, 0), (19, 2)));
}

#[test]
fn typescript_members() {
    let symbols = outline(Language::TypeScript, TS_SOURCE);
    assert_eq!(
        children(&symbols[0]),
        vec![("id", SymbolKind::PROPERTY), ("email", SymbolKind::PROPERTY), ("greet", SymbolKind::METHOD)]
    );
    assert_eq!(children(&symbols[1]), vec![("cache", SymbolKind::PROPERTY), ("load", SymbolKind::METHOD)]);
    assert_eq!(symbols[1].range, range((9, 0), (15, 1)));
}

#[test]
fn braces_in_strings_and_comments_do_not_count() {
    assert_eq!(brace_delta("func f() { // }"), 1);
    assert_eq!(brace_delta(r#"s := "{" + `}`"#), 0);
    assert_eq!(brace_delta("r := '{'"), 0);
    assert_eq!(brace_delta(r#"msg := "a \"{\" b""#), 0);
    assert_eq!(brace_delta("}"), -1);
}

#[test]
fn empty_text_has_no_symbols() {
    assert!(outline(Language::Go, "").is_empty());
    assert!(outline(Language::TypeScript, "// nothing here\n").is_empty());
}
