//! Forward mapping over the demo tree.

use std::sync::Arc;
use std::thread;

use http::{Method, StatusCode};
use urlmap::dispatch::{CallGraph, EdgeKind, Observer, Trace};
use urlmap::mapping::Value;
use urlmap::resource::{BufferedResponse, Outcome};
use urlmap::{DispatchError, Dispatcher, Request};
use uuid::Uuid;

mod common;

fn dispatcher(root: Option<&str>) -> Dispatcher {
    Dispatcher::new(common::demo_mapper(root))
}

fn get(d: &Dispatcher, uri: &str) -> (Result<Outcome, DispatchError>, BufferedResponse) {
    let mut resp = BufferedResponse::new();
    let result = d.dispatch(Request::get(uri), &mut resp);
    (result, resp)
}

#[test]
fn test_leaf_serves() {
    let d = dispatcher(None);
    let (result, resp) = get(&d, "/home");
    assert_eq!(result.unwrap(), Outcome::Handled);
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body(), "home, styled by /style.css");
}

#[test]
fn test_variable_components() {
    let d = dispatcher(None);
    let (_, resp) = get(&d, "/users/martin/name");
    assert_eq!(resp.body(), "name of martin");

    let (_, resp) = get(&d, "/users/martin/data/photos");
    assert_eq!(resp.body(), "photos of martin");

    let (_, resp) = get(&d, "/lcomp/president");
    assert_eq!(resp.body(), "component president");

    let (_, resp) = get(&d, "/formatted/00001042");
    assert_eq!(resp.body(), "uid 1042");
}

#[test]
fn test_not_found_paths() {
    let d = dispatcher(None);
    for uri in ["/nothing", "/home/extra", "/users/Martin/name", "/users/martin/bogus", "/lcomp"] {
        let (result, resp) = get(&d, uri);
        assert_eq!(result.unwrap(), Outcome::NotFound, "{uri}");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[test]
fn test_method_table() {
    let d = dispatcher(None);
    let mut resp = BufferedResponse::new();
    let outcome = d
        .dispatch(Request::get("/wopts").with_arg("cat", "Miou-Miou"), &mut resp)
        .unwrap();
    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(resp.body(), "cat: Miou-Miou");

    let mut resp = BufferedResponse::new();
    let outcome = d.dispatch(Request::new(Method::POST, "/wopts"), &mut resp).unwrap();
    assert_eq!(outcome, Outcome::NotFound);
}

#[test]
fn test_folder_default_and_directory_redirect() {
    let d = dispatcher(Some("/app"));

    let (result, resp) = get(&d, "/app/");
    assert_eq!(result.unwrap(), Outcome::Handled);
    assert_eq!(resp.body(), "home, styled by /app/style.css");

    let (_, resp) = get(&d, "/app");
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.location(), Some("/app/"));

    let (_, resp) = get(&d, "/app/fold");
    assert_eq!(resp.location(), Some("/app/fold/"));
}

#[test]
fn test_menu_lists_children() {
    let d = dispatcher(None);
    let (_, resp) = get(&d, "/fold/");
    assert_eq!(resp.content_type(), Some("text/html"));
    assert!(resp.body().contains(r#"<a href="/fold/greed">greed</a>"#));
    assert!(resp.body().contains(r#"<a href="/fold/think">think</a>"#));

    let (_, resp) = get(&d, "/fold/ham");
    assert_eq!(resp.body(), "insight, not numbers");
}

#[test]
fn test_delegator_shares_context() {
    let d = dispatcher(None);
    let (_, resp) = get(&d, "/deleg");
    assert_eq!(resp.body(), "The answer is: 42");
}

#[test]
fn test_external_redirect() {
    let d = dispatcher(None);
    let (result, resp) = get(&d, "/redirtest");
    assert_eq!(result.unwrap(), Outcome::Handled);
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.location(), Some("/home"));
}

#[derive(Default)]
struct LastTrace(std::sync::Mutex<Option<Trace>>);

impl Observer for LastTrace {
    fn end(&self, _request_id: Uuid, trace: &Trace) {
        *self.0.lock().unwrap() = Some(trace.clone());
    }
}

#[test]
fn test_internal_redirect() {
    let traces = Arc::new(LastTrace::default());
    let d = Dispatcher::new(common::demo_mapper(Some("/app"))).with_observer(traces.clone());

    let (result, resp) = get(&d, "/app/internalredir");
    assert_eq!(result.unwrap(), Outcome::Handled);
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body(), "username martin");

    let trace = traces.0.lock().unwrap().clone().unwrap();
    assert_eq!(trace.redirects(), 1);
    assert_eq!(trace.outcome(), Some("handled"));
    assert_eq!(
        trace.handled(),
        [
            "@@Root",
            "@@InternalRedirectTest",
            "@@Root",
            "@@UsernameRoot",
            "@@Folder",
            "@@PrintUsername"
        ]
    );
    assert_eq!(
        trace.rendered(),
        [(Some("@@InternalRedirectTest".to_string()), "@@PrintUsername".to_string())]
    );
}

#[test]
fn test_redirect_ceiling() {
    let d = dispatcher(None).with_max_redirects(Some(3));
    let (result, _) = get(&d, "/loop");
    assert!(matches!(result, Err(DispatchError::RedirectLimit { limit: 3 })));
}

#[test]
fn test_root_mismatch() {
    let d = dispatcher(Some("/app"));
    let (result, _) = get(&d, "/other/home");
    assert!(matches!(result, Err(DispatchError::RootMismatch { .. })));
}

#[test]
fn test_call_graph_observer() {
    let graph = CallGraph::new();
    let d = dispatcher(None).with_observer(graph.clone());
    get(&d, "/home");
    get(&d, "/home");

    assert_eq!(graph.count("@@Root", "@@Home", EdgeKind::Delegate), 2);
    assert_eq!(graph.count("@@Home", "@@Stylesheet", EdgeKind::Render), 2);
}

#[test]
fn test_misc_resources() {
    let d = dispatcher(None);

    let (_, resp) = get(&d, "/logged");
    assert_eq!(resp.body(), "logged");
    assert_eq!(resp.log_lines(), ["----------------------------- /logged"]);

    let (_, resp) = get(&d, "/resources");
    assert_eq!(resp.content_type(), Some("text/plain"));
    assert!(resp.body().lines().any(|l| l.starts_with("@@Home ") && l.ends_with(": /home")));
}

#[test]
fn test_publish_swaps_mapper() {
    let d = dispatcher(None);
    let (_, resp) = get(&d, "/home");
    assert_eq!(resp.status(), StatusCode::OK);

    d.publish(common::demo_mapper(Some("/v2")));
    let (result, _) = get(&d, "/home");
    assert!(matches!(result, Err(DispatchError::RootMismatch { .. })));
    let (_, resp) = get(&d, "/v2/home");
    assert_eq!(resp.body(), "home, styled by /v2/style.css");
}

#[test]
fn test_table_only_mapper_cannot_dispatch() {
    let lines = common::demo_mapper(None).serialize_table(Default::default());
    let table = urlmap::Mapper::deserialize_table(&lines, Default::default()).unwrap();
    let d = Dispatcher::new(table);
    let (result, _) = get(&d, "/home");
    assert!(matches!(result, Err(DispatchError::NoTree)));
}

#[test]
fn test_concurrent_dispatch_shares_tree() {
    let d = Arc::new(dispatcher(None));
    let handles: Vec<_> = ["alice", "bob", "carol", "dave"]
        .into_iter()
        .map(|user| {
            let d = Arc::clone(&d);
            thread::spawn(move || {
                for _ in 0..50 {
                    let (_, resp) = get(&d, &format!("/users/{user}/name"));
                    assert_eq!(resp.body(), format!("name of {user}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_match_agrees_with_dispatch() {
    let d = dispatcher(None);
    let mapper = d.mapper();
    let url = mapper
        .render("@@IntegerComponent", urlmap::Params::new().arg(77))
        .unwrap();
    assert_eq!(
        mapper.match_url("@@IntegerComponent", &url).unwrap().unwrap()["uid"],
        Value::Int(77)
    );
    let (_, resp) = get(&d, &url);
    assert_eq!(resp.body(), "uid 77");
}

#[test]
fn test_component_rejected_by_format_is_not_found() {
    let d = dispatcher(None);
    for uri in ["/formatted/abc", "/formatted/12ab", "/formatted/1.5"] {
        let (result, resp) = get(&d, uri);
        assert_eq!(result.unwrap(), Outcome::NotFound, "{uri}");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(d.mapper().match_url("@@IntegerComponent", uri).unwrap(), None, "{uri}");
    }
}

#[test]
fn test_negative_integer_round_trips_through_dispatch() {
    let d = dispatcher(None);
    let mapper = d.mapper();
    let url = mapper
        .render("@@IntegerComponent", urlmap::Params::new().arg(-42))
        .unwrap();
    assert_eq!(url, "/formatted/-0000042");
    assert_eq!(
        mapper.match_url("@@IntegerComponent", &url).unwrap().unwrap()["uid"],
        Value::Int(-42)
    );
    let (_, resp) = get(&d, &url);
    assert_eq!(resp.body(), "uid -42");
}

#[test]
fn test_reserved_characters_reach_the_resource() {
    let d = dispatcher(Some("/app"));
    let mapper = d.mapper();
    for value in ["a/b", "x?y", "c#d", "a b", "50%"] {
        let url = mapper
            .render("@@LeafPlusOneComponent", urlmap::Params::new().arg(value))
            .unwrap();
        assert_eq!(
            mapper.match_url("@@LeafPlusOneComponent", &url).unwrap().unwrap()["comp"],
            Value::from(value),
            "{url}"
        );
        let (result, resp) = get(&d, &url);
        assert_eq!(result.unwrap(), Outcome::Handled, "{url}");
        assert_eq!(resp.body(), format!("component {value}"), "{url}");
    }
}
