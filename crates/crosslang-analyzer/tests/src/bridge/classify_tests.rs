use std::sync::Arc;

use super::*;
use crate::{document::DocumentStore, workspace::WorkspaceSource};

const GO_SOURCE: &str = r#"package api

type Status = string

const (
	StatusActive   Status = "active"
	StatusInactive Status = "inactive"
)

const MaxUsers = 100

type User struct {
	ID    string `json:"id"`
	Email string `json:"email"`
}

type UserService interface {
	GetUser(id string) User
}

func GetUser(id string) User {
	return User{ID: id}
}

func defaultStatus() Status { return StatusActive }
"#;

const TS_SOURCE: &str = r#"export const StatusActive = "active";
export const StatusInactive = "inactive";
export type Status = typeof StatusActive | typeof StatusInactive;

export interface User {
  id: string;
  email: string;
}

export type UserDTO = {
  id: string;
};

export interface UserService {
  getUser(id: string): User;
}

export function getUser(id: string): User {
  return { id, email: "" };
}
"#;

/// Position of `word` on the first line containing `line_needle`.
fn at(
    text: &str,
    line_needle: &str,
    word: &str,
) -> Position {
    let (line_idx, line) = text.lines().enumerate().find(|(_, line)| line.contains(line_needle)).unwrap();
    let column = line.find(word).unwrap();
    Position::new(line_idx as u32, column as u32 + 1)
}

async fn classify_in(
    path: &str,
    text: &str,
    position: Position,
) -> Option<Classification> {
    let store = Arc::new(DocumentStore::new());
    let uri = Url::parse(path).unwrap();
    store.open(uri.clone(), text.to_string(), 1);
    let source = WorkspaceSource::new(store);
    classify(&source, &uri, position).await
}

async fn go_at(
    line_needle: &str,
    word: &str,
) -> Option<Classification> {
    classify_in("file:///virtual/api/user.go", GO_SOURCE, at(GO_SOURCE, line_needle, word)).await
}

async fn ts_at(
    line_needle: &str,
    word: &str,
) -> Option<Classification> {
    classify_in("file:///virtual/api/user.ts", TS_SOURCE, at(TS_SOURCE, line_needle, word)).await
}

#[tokio::test]
async fn go_declarations_classify_by_shape() {
    let enum_type = go_at("type Status", "Status").await.unwrap();
    assert_eq!(enum_type.category(), "enum-type");

    let enum_const = go_at("StatusActive   Status", "StatusActive").await.unwrap();
    assert_eq!(enum_const.category(), "enum-const");
    assert_eq!(enum_const.name(), "StatusActive");

    let shape = go_at("type User struct", "User").await.unwrap();
    assert_eq!(shape.category(), "shape");

    let interface = go_at("type UserService", "UserService").await.unwrap();
    assert_eq!(interface.category(), "interface");

    let function = go_at("func GetUser", "GetUser").await.unwrap();
    assert_eq!(function.category(), "function");
    assert_eq!(function.language(), Language::Go);
}

#[tokio::test]
async fn go_field_carries_json_tag() {
    let Some(Classification::Field(info)) = go_at("Email string", "Email").await else {
        panic!("expected a field");
    };
    assert_eq!(info.name, "Email");
    assert_eq!(info.json_tag.as_deref(), Some("email"));
    assert_eq!(info.parent.name, "User");
}

#[tokio::test]
async fn go_interface_method_keeps_its_interface() {
    let Some(Classification::InterfaceMethod {
        interface,
        method,
    }) = go_at("GetUser(id string) User", "GetUser").await
    else {
        panic!("expected an interface method");
    };
    assert_eq!(interface.name, "UserService");
    assert!(interface.has_methods);
    assert_eq!(method.name, "GetUser");
}

#[tokio::test]
async fn plain_constants_are_not_matchable() {
    assert_eq!(go_at("const MaxUsers", "MaxUsers").await, None);
}

#[tokio::test]
async fn usage_sites_resolve_through_definitions() {
    let usage = go_at("return StatusActive", "StatusActive").await.unwrap();
    assert_eq!(usage.category(), "enum-const");
    let Classification::EnumConst(info) = usage else {
        unreachable!();
    };
    assert_eq!(info.symbol.selection_range.start.line, 5);
}

#[tokio::test]
async fn cursor_inside_a_body_falls_back_to_the_enclosing_function() {
    let inside = go_at("return User{", "return").await.unwrap();
    assert_eq!(inside.category(), "function");
    assert_eq!(inside.name(), "GetUser");
}

#[tokio::test]
async fn typescript_declarations_classify_by_shape() {
    assert_eq!(ts_at("export type Status", "Status").await.unwrap().category(), "enum-type");
    assert_eq!(ts_at("export const StatusActive", "StatusActive").await.unwrap().category(), "enum-const");
    assert_eq!(ts_at("export interface User {", "User").await.unwrap().category(), "shape");
    assert_eq!(ts_at("export type UserDTO", "UserDTO").await.unwrap().category(), "shape");
    assert_eq!(ts_at("export interface UserService", "UserService").await.unwrap().category(), "interface");
    assert_eq!(ts_at("getUser(id: string): User;", "getUser").await.unwrap().category(), "interface-method");
    assert_eq!(ts_at("export function getUser", "getUser").await.unwrap().category(), "function");
}

#[tokio::test]
async fn typescript_property_has_no_tag() {
    let Some(Classification::Field(info)) = ts_at("email: string", "email").await else {
        panic!("expected a property");
    };
    assert_eq!(info.json_tag, None);
    assert_eq!(info.parent.name, "User");
}

#[tokio::test]
async fn typeof_operand_resolves_to_the_constant() {
    let found = ts_at("export type Status", "StatusActive").await.unwrap();
    assert_eq!(found.category(), "enum-const");
    assert_eq!(found.name(), "StatusActive");
}

#[tokio::test]
async fn other_languages_are_ignored() {
    let found = classify_in("file:///virtual/api/user.rs", "fn main() {}", Position::new(0, 3)).await;
    assert_eq!(found, None);
}
