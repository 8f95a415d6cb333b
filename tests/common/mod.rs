//! Shared fixtures for integration tests: a demo site exercising every
//! resource variant.

#![allow(dead_code)]

use std::ops::ControlFlow;
use std::sync::Arc;

use http::Method;
use urlmap::mapping::{Mapper, MapperOptions, Params, TableOrder, Variable};
use urlmap::resource::misc::{LogRequests, Redirect, TableResource};
use urlmap::resource::{Context, Delegator, Folder, Leaf, NodeId, Outcome, Tree, TreeBuilder, VarDelegator, VarLeaf};
use urlmap::DispatchError;

/// Value the `Augmenter` delegator leaves for the `AnswerBabbler` leaf.
#[derive(Clone, Copy)]
pub struct Answer(pub u32);

pub struct Demo {
    pub tree: Arc<Tree>,
    pub root: NodeId,
    pub home: NodeId,
    pub fold: NodeId,
    pub print_name: NodeId,
}

fn write(ctx: &mut Context<'_>, text: &str) -> Result<Outcome, DispatchError> {
    ctx.response().set_content_type("text/plain");
    ctx.response().write(text);
    Ok(Outcome::Handled)
}

fn slot(ctx: &Context<'_>, name: &str) -> String {
    ctx.slot(name).map(ToString::to_string).unwrap_or_default()
}

fn simple(id: &str, message: &'static str) -> Leaf {
    Leaf::new("SimpleResource")
        .id(id)
        .any(move |ctx| write(ctx, message))
}

pub fn demo_tree() -> Demo {
    let mut b = TreeBuilder::new();

    let home = b.add(Leaf::new("Home").on(Method::GET, |ctx| {
        let style = ctx.url("@@Stylesheet", Params::new())?;
        write(ctx, &format!("home, styled by {style}"))
    }));
    let special = b.add(
        Leaf::new("SpecialResource")
            .id("@@ImSpecial")
            .any(|ctx| write(ctx, "not that special")),
    );

    let babbler = b.add(Leaf::new("AnswerBabbler").any(|ctx| {
        let answer = ctx.extensions().get::<Answer>().map_or(0, |a| a.0);
        write(ctx, &format!("The answer is: {answer}"))
    }));
    let deleg = b.add(Delegator::new("Augmenter", babbler).guard(|ctx| {
        ctx.extensions_mut().insert(Answer(42));
        Ok(ControlFlow::Continue(()))
    }));

    let print_username = b.add(Leaf::new("PrintUsername").any(|ctx| {
        let text = format!("username {}", slot(ctx, "username"));
        write(ctx, &text)
    }));
    let print_name = b.add(Leaf::new("PrintName").any(|ctx| {
        let text = format!("name of {}", slot(ctx, "username"));
        write(ctx, &text)
    }));
    let user_data = b.add(VarLeaf::new("UserData", Variable::new("userdata")).any(|ctx| {
        let text = format!("{} of {}", slot(ctx, "userdata"), slot(ctx, "username"));
        write(ctx, &text)
    }));
    let user_folder = b.add(
        Folder::new()
            .child("username", print_username)
            .child("name", print_name)
            .child("data", user_data),
    );
    let users = b.add(
        VarDelegator::new("UsernameRoot", Variable::new("username"), user_folder).guard(|ctx| {
            let valid = ctx
                .slot("username")
                .map(|v| v.to_string().chars().all(|c| c.is_ascii_lowercase()))
                .unwrap_or(false);
            Ok(if valid {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(Outcome::NotFound)
            })
        }),
    );

    let redirtest = b.add(Redirect::new("@@Home").id("@@RedirectTest"));
    let internalredir = b.add(Leaf::new("InternalRedirectTest").any(|ctx| {
        let target = ctx.url("@@PrintUsername", Params::new().named("username", "martin"))?;
        Ok(Outcome::redirect(target))
    }));
    let looping = b.add(Leaf::new("LoopForever").any(|ctx| {
        let target = ctx.url("@@LoopForever", Params::new())?;
        Ok(Outcome::redirect(target))
    }));

    let wopts = b.add(
        Leaf::new("OptionalParams")
            .optional(Variable::new("cat"))
            .optional(Variable::new("dog"))
            .optional(Variable::formatted("nbanimals", "%05d").expect("valid format"))
            .on(Method::GET, |ctx| {
                let cat = ctx.args().get("cat").cloned().unwrap_or_default();
                write(ctx, &format!("cat: {cat}"))
            }),
    );
    let lcomp = b.add(VarLeaf::new("LeafPlusOneComponent", Variable::new("comp")).any(|ctx| {
        let text = format!("component {}", slot(ctx, "comp"));
        write(ctx, &text)
    }));

    let greed = b.add(simple("@@SimpleGreed", "enough to meet man's need"));
    let think = b.add(simple("@@SimpleThought", "wavelengths that people cannot see"));
    let ham = b.add(simple("@@SimpleHamming", "insight, not numbers"));
    let fold = b.add(
        Folder::named("DemoFolderWithMenu")
            .listing()
            .child("greed", greed)
            .child("think", think)
            .child("ham", ham),
    );

    let formatted = b.add(
        VarLeaf::new(
            "IntegerComponent",
            Variable::formatted("uid", "%08d").expect("valid format"),
        )
        .any(|ctx| {
            let text = format!("uid {}", slot(ctx, "uid"));
            write(ctx, &text)
        }),
    );
    let resources = b.add(TableResource::new(TableOrder::ById));
    let logged_leaf = b.add(Leaf::new("Logged").any(|ctx| write(ctx, "logged")));
    let logged = b.add(LogRequests::new(logged_leaf));

    let root = b.add(
        Folder::new()
            .id("@@Root")
            .default_named("home")
            .child("home", home)
            .child("altit", special)
            .child("deleg", deleg)
            .child("users", users)
            .child("redirtest", redirtest)
            .child("internalredir", internalredir)
            .child("loop", looping)
            .child("wopts", wopts)
            .child("lcomp", lcomp)
            .child("fold", fold)
            .child("formatted", formatted)
            .child("resources", resources)
            .child("logged", logged),
    );

    let tree = b.build(root).expect("root was added");
    Demo {
        tree: Arc::new(tree),
        root,
        home,
        fold,
        print_name,
    }
}

/// Demo tree mapped under `root`, plus the demo's static and alias mappings.
pub fn demo_mapper(root: Option<&str>) -> Mapper {
    let demo = demo_tree();
    mapper_for(&demo, root)
}

pub fn mapper_for(demo: &Demo, root: Option<&str>) -> Mapper {
    let mut mapper = Mapper::new(MapperOptions {
        root_location: root.map(str::to_owned),
        ..MapperOptions::default()
    });
    mapper.initialize(demo.tree.clone()).expect("demo tree maps");
    mapper.add_static("@@Stylesheet", "style.css").unwrap();
    mapper.add_static("@@ExternalExample", "http://example.com/x").unwrap();
    mapper.add_static("@@Atocha", "/atocha/index.html").unwrap();
    mapper.add_alias("@@AliasExample", "@@SimpleThought").unwrap();
    mapper
}
