mod grid;

use std::path::PathBuf;

use gpui::*;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use gridcells::settings::GridSettings;
use gridcells::theme::Theme;
use grid::*;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,gridcells=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Settings come from the file named by `GRID_SETTINGS`, if any.
fn load_settings() -> GridSettings {
    let Some(path) = std::env::var_os("GRID_SETTINGS").map(PathBuf::from) else {
        return GridSettings::default();
    };
    GridSettings::load_file(&path).unwrap_or_else(|err| {
        warn!(error = %err, "using default grid settings");
        GridSettings::default()
    })
}

fn main() {
    init_logging();
    let settings = load_settings();

    Application::new().run(move |cx| {
        Theme::init(cx);

        cx.bind_keys([
            KeyBinding::new("up", MoveUp, Some("NormalMode")),
            KeyBinding::new("down", MoveDown, Some("NormalMode")),
            KeyBinding::new("left", MoveLeft, Some("NormalMode")),
            KeyBinding::new("right", MoveRight, Some("NormalMode")),
            KeyBinding::new("k", MoveUp, Some("NormalMode")),
            KeyBinding::new("j", MoveDown, Some("NormalMode")),
            KeyBinding::new("h", MoveLeft, Some("NormalMode")),
            KeyBinding::new("l", MoveRight, Some("NormalMode")),
            KeyBinding::new("enter", EnterEditMode, Some("NormalMode")),
            KeyBinding::new("i", EnterEditMode, Some("NormalMode")),
            KeyBinding::new("space", ActivateCell, Some("NormalMode")),
            KeyBinding::new("cmd-q", Quit, None),
        ]);

        cx.on_action::<Quit>(|_, cx| {
            cx.quit();
        });

        let window_options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(1000.), px(640.)),
                cx,
            ))),
            titlebar: Some(TitlebarOptions {
                title: Some("gridcells".into()),
                appears_transparent: false,
                ..Default::default()
            }),
            window_min_size: Some(size(px(MIN_WINDOW_WIDTH), px(MIN_WINDOW_HEIGHT))),
            ..Default::default()
        };

        cx.open_window(window_options, |window, cx| {
            let app = cx.new(|cx| GridApp::new(settings, cx));
            let focus_handle = app.read(cx).grid().focus_handle(cx);
            focus_handle.focus(window);
            app
        })
        .unwrap();
    });
}
