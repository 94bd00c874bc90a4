// src/registry/catalogue.rs

//! The built-in static-site module catalogue.
//!
//! Each module is a thin binding between an identity in the registry and
//! an opaque collaborator: an external engine command when one is
//! configured under `[engines]`, otherwise a pass-through copy of the
//! module's source directory. Some modules are feature-gated here even
//! when their task would also self-gate, to keep pipelines minimal.
//!
//! Watch rules are conservative: templates and binary assets reload the
//! dev session after rebuilding, styles and scripts rely on the engine's
//! own injection and only re-run the task.

use crate::context::BuildContext;
use crate::errors::Result;
use crate::registry::module::{ModuleDescriptor, WatchRule};
use crate::registry::Registry;
use crate::tasks::{command_task, copy_dir_task, TaskFn};
use crate::types::{ModuleKind, WatchAction};

/// Build the registry for one pipeline construction.
pub fn built_in_registry(ctx: &BuildContext) -> Result<Registry> {
    let e = &ctx.config().engines;

    let t_templates = module_task(ctx, "templates", e.templates.as_deref(), "pages", "");
    let t_styles = module_task(ctx, "styles", e.styles.as_deref(), "styles", "styles");
    let t_scripts = module_task(ctx, "scripts", e.scripts.as_deref(), "scripts", "scripts");
    let t_fonts = module_task(ctx, "fonts", None, "fonts", "fonts");
    let t_images = module_task(ctx, "images", e.images.as_deref(), "assets/images", "assets/images");
    let t_svg = module_task(ctx, "svg", e.svg.as_deref(), "assets/svg", "assets/svg");
    let t_svg_sprite = module_task(
        ctx,
        "svgSprite",
        e.svg_sprite.as_deref(),
        "assets/icons",
        "assets/icons",
    );
    let t_favicons = module_task(ctx, "favicons", e.favicons.as_deref(), "assets/favicons", "");
    let t_static = module_task(ctx, "static", None, "static", "");
    let t_video = module_task(ctx, "media.video", e.video.as_deref(), "assets/video", "assets/video");
    let t_audio = module_task(ctx, "media.audio", e.audio.as_deref(), "assets/audio", "assets/audio");

    let modules = vec![
        ModuleDescriptor::new("templates")
            .order(10)
            .task(t_templates.clone())
            .watch_rules({
                let task = t_templates.clone();
                move |ctx| {
                    vec![WatchRule::new(
                        "templates",
                        ctx.paths().pages_watch(),
                        task.clone(),
                        WatchAction::Reload,
                    )]
                }
            }),
        ModuleDescriptor::new("styles")
            .order(20)
            .task(t_styles.clone())
            .watch_rules({
                let task = t_styles;
                move |ctx| {
                    vec![WatchRule::new(
                        "styles",
                        ctx.paths().styles_watch(),
                        task.clone(),
                        WatchAction::Task,
                    )]
                }
            }),
        ModuleDescriptor::new("scripts")
            .order(30)
            .task(t_scripts.clone())
            .watch_rules({
                let task = t_scripts;
                move |ctx| {
                    vec![WatchRule::new(
                        "scripts",
                        ctx.paths().scripts_watch(),
                        task.clone(),
                        WatchAction::Task,
                    )]
                }
            }),
        ModuleDescriptor::new("fonts")
            .order(40)
            .task(t_fonts.clone())
            .watch_rules({
                let task = t_fonts;
                move |ctx| {
                    vec![WatchRule::new(
                        "fonts",
                        ctx.paths().fonts_watch(),
                        task.clone(),
                        WatchAction::Reload,
                    )]
                }
            }),
        ModuleDescriptor::new("images")
            .order(50)
            .task(t_images.clone())
            .watch_rules({
                let task = t_images;
                move |ctx| {
                    vec![WatchRule::new(
                        "images",
                        ctx.paths().images_watch(),
                        task.clone(),
                        WatchAction::Reload,
                    )]
                }
            }),
        ModuleDescriptor::new("svg")
            .order(60)
            .task(t_svg.clone())
            .watch_rules({
                let task = t_svg;
                move |ctx| {
                    vec![WatchRule::new(
                        "svg",
                        ctx.paths().svg_watch(),
                        task.clone(),
                        WatchAction::Reload,
                    )]
                }
            }),
        // The sprite is assembled from the optimized svg output, so it has
        // to land in a later layer than the svg module.
        ModuleDescriptor::new("svgSprite")
            .order(70)
            .depends_on(["svg"])
            .enabled_when(|ctx| ctx.features().svg_sprite.enabled)
            .task(t_svg_sprite.clone())
            .watch_rules({
                let task = t_svg_sprite;
                move |ctx| {
                    vec![WatchRule::new(
                        "svgSprite",
                        ctx.paths().icons_watch(),
                        task.clone(),
                        WatchAction::Reload,
                    )]
                }
            }),
        ModuleDescriptor::new("favicons")
            .order(80)
            .enabled_when(|ctx| ctx.features().favicons.enabled)
            .task(t_favicons.clone())
            .watch_rules({
                let task = t_favicons;
                move |ctx| {
                    vec![WatchRule::new(
                        "favicons",
                        ctx.paths().favicons_watch(),
                        task.clone(),
                        WatchAction::Reload,
                    )]
                }
            }),
        ModuleDescriptor::new("static")
            .order(90)
            .enabled_when(|ctx| ctx.features().static_files.enabled)
            .task(t_static.clone())
            .watch_rules({
                let task = t_static;
                move |ctx| {
                    vec![WatchRule::new(
                        "static",
                        ctx.paths().static_watch(),
                        task.clone(),
                        WatchAction::Reload,
                    )]
                }
            }),
        ModuleDescriptor::new("media.video")
            .order(100)
            .enabled_when(|ctx| ctx.features().media.video.enabled)
            .task(t_video.clone())
            .watch_rules({
                let task = t_video;
                move |ctx| {
                    vec![WatchRule::new(
                        "video",
                        ctx.paths().video_watch(),
                        task.clone(),
                        WatchAction::Reload,
                    )]
                }
            }),
        ModuleDescriptor::new("media.audio")
            .order(110)
            .enabled_when(|ctx| ctx.features().media.audio.enabled)
            .task(t_audio.clone())
            .watch_rules({
                let task = t_audio;
                move |ctx| {
                    vec![WatchRule::new(
                        "audio",
                        ctx.paths().audio_watch(),
                        task.clone(),
                        WatchAction::Reload,
                    )]
                }
            }),
        // Locale data feeds the template engine; the module contributes a
        // watch rule only and never participates in compile layering.
        ModuleDescriptor::new("i18n.locales")
            .kind(ModuleKind::Watch)
            .order(5)
            .enabled_when(|ctx| ctx.features().i18n.enabled)
            .watch_rules({
                let task = t_templates;
                move |ctx| {
                    vec![WatchRule::new(
                        "locales",
                        ctx.paths().locales_watch(),
                        task.clone(),
                        WatchAction::Reload,
                    )]
                }
            }),
    ];

    Registry::new(modules)
}

/// Bind a module to its collaborator: the configured engine command, or a
/// pass-through copy from `src/<src_sub>` into `<out>/<out_sub>`.
fn module_task(
    ctx: &BuildContext,
    id: &str,
    engine_cmd: Option<&str>,
    src_sub: &str,
    out_sub: &str,
) -> TaskFn {
    match engine_cmd {
        Some(cmd) => command_task(id, cmd),
        None => {
            let from = ctx.paths().src.join(src_sub);
            let to = if out_sub.is_empty() {
                ctx.out_dir()
            } else {
                ctx.out_dir().join(out_sub)
            };
            copy_dir_task(id, from, to)
        }
    }
}
