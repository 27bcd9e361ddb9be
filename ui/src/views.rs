//! Widget trees for every screen of the application.

use crate::carousel::Background;
use crate::style::{self, Palette};
use crate::{faces, grid, sidebar, summary, tags, LightboxUI, Message, PreviewState};
use api_client::{Folder, Photo};
use cache::QueryState;
use iced::alignment::Horizontal;
use iced::widget::{
    button, column, container, image, mouse_area, progress_bar, row, scrollable, slider, text,
    tooltip, Column, Row, Space,
};
use iced::{Alignment, ContentFit, Element, Length};

pub const THUMB_WIDTH: f32 = 96.0;
pub const THUMB_SPACING: f32 = 4.0;
const FACE_SIZE: f32 = 56.0;
const SIDEBAR_PREVIEW_HEIGHT: f32 = 160.0;

pub fn grid_scroll_id() -> scrollable::Id {
    scrollable::Id::new("photo-grid")
}

pub fn thumbnail_strip_id() -> scrollable::Id {
    scrollable::Id::new("thumbnail-strip")
}

fn horizontal() -> scrollable::Direction {
    scrollable::Direction::Horizontal(scrollable::Properties::new())
}

fn skeleton<'a>(width: impl Into<Length>, height: impl Into<Length>) -> Element<'a, Message> {
    container(Space::new(width, height))
        .style(style::skeleton())
        .into()
}

pub fn root(app: &LightboxUI) -> Element<'_, Message> {
    let mut page = Column::new();
    if let Some(banner) = error_banner(app) {
        page = page.push(banner);
    }

    if app.carousel_open() {
        page = page.push(carousel_view(app));
    } else {
        let content = match app.router.current() {
            crate::Route::Launch => onboarding(),
            _ if app.store.current_folder().is_none() => container(
                text("Loading folders...").style(Palette::MUTED),
            )
            .center_x()
            .center_y()
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
            _ => gallery(app),
        };
        page = page.push(row![folder_tree(app), content].height(Length::Fill));
    }

    if let Some(toast) = preview_toast(app) {
        page = page.push(
            container(toast)
                .width(Length::Fill)
                .align_x(Horizontal::Right)
                .padding(8),
        );
    }
    page.into()
}

fn error_banner(app: &LightboxUI) -> Option<Element<'_, Message>> {
    if app.errors.is_empty() {
        return None;
    }
    let mut list = Column::new().spacing(5);
    for (i, msg) in app.errors.iter().enumerate() {
        list = list.push(
            row![
                text(msg).size(14).width(Length::Fill),
                button("Dismiss")
                    .style(style::primary_button())
                    .on_press(Message::DismissError(i))
            ]
            .spacing(10)
            .align_items(Alignment::Center),
        );
    }
    let banner = column![
        row![
            text("Operation failed").size(16).width(Length::Fill),
            button("Dismiss All")
                .style(style::primary_button())
                .on_press(Message::ClearErrors)
        ]
        .spacing(10)
        .align_items(Alignment::Center),
        list
    ]
    .spacing(5);
    Some(
        container(banner)
            .style(style::error_banner())
            .padding(10)
            .width(Length::Fill)
            .into(),
    )
}

fn onboarding<'a>() -> Element<'a, Message> {
    let intro = column![
        text("Welcome to Lightbox").size(28),
        text(
            "Import a folder of photos to get started. Previews, tags and faces \
             are prepared in the background while you browse."
        )
        .size(16)
        .style(Palette::MUTED),
        button(text("Import folder"))
            .style(style::primary_button())
            .padding([8, 16])
            .on_press(Message::ImportFolder),
    ]
    .spacing(Palette::SPACING)
    .align_items(Alignment::Center)
    .max_width(480);

    container(intro)
        .center_x()
        .center_y()
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn folder_tree(app: &LightboxUI) -> Element<'_, Message> {
    let mut list = Column::new().spacing(4);
    let folders: &[Folder] = app.folders.data(&()).map(Vec::as_slice).unwrap_or(&[]);
    let current = app.store.current_folder().map(|f| f.id.as_str());

    for group in sidebar::group_by_drive(folders) {
        let expanded = app.sidebar.is_expanded(&group.name);
        let marker = if expanded { "v" } else { ">" };
        list = list.push(
            button(text(format!("{} {}", marker, group.name)).size(13))
                .style(style::flat_button(false))
                .width(Length::Fill)
                .on_press(Message::ToggleGroup(group.name.clone())),
        );
        if !expanded {
            continue;
        }
        for folder in group.folders {
            let label = row![
                text(sidebar::ellipsis_path(&folder.path))
                    .size(14)
                    .width(Length::Fill),
                text(folder.photo_count).size(12).style(Palette::MUTED),
            ]
            .spacing(8)
            .align_items(Alignment::Center);
            let leaf = button(label)
                .style(style::flat_button(current == Some(folder.id.as_str())))
                .width(Length::Fill)
                .padding([4, 8, 4, 20])
                .on_press(Message::SelectFolder(folder.clone()));
            list = list.push(mouse_area(leaf).on_right_press(Message::FolderContext(folder.clone())));
        }
    }

    if folders.is_empty() && app.folders.is_fetching(&()) {
        list = list.push(text("Loading folders...").size(13).style(Palette::MUTED));
    }
    if let Some(target) = app.sidebar.context_target() {
        list = list.push(context_menu(target));
    }

    let mut body = column![
        button(text("Import folder"))
            .style(style::primary_button())
            .width(Length::Fill)
            .on_press(Message::ImportFolder),
        scrollable(list).height(Length::Fill),
    ]
    .spacing(12);
    if let Some(preview) = selected_photo_preview(app) {
        body = body.push(preview);
    }

    container(body)
        .padding(12)
        .width(Length::Fixed(Palette::SIDEBAR_WIDTH))
        .height(Length::Fill)
        .style(style::sidebar())
        .into()
}

fn context_menu(target: &Folder) -> Element<'_, Message> {
    let menu = column![
        text(sidebar::ellipsis_path(&target.path))
            .size(12)
            .style(Palette::MUTED),
        button(text("Open"))
            .style(style::flat_button(false))
            .width(Length::Fill)
            .on_press(Message::SelectFolder(target.clone())),
        button(text("Remove folder"))
            .style(style::flat_button(false))
            .width(Length::Fill)
            .on_press(Message::DeleteFolder(target.clone())),
        button(text("Cancel"))
            .style(style::flat_button(false))
            .width(Length::Fill)
            .on_press(Message::CloseContextMenu),
    ]
    .spacing(4);
    container(menu).padding(8).style(style::card()).into()
}

fn selected_photo_preview(app: &LightboxUI) -> Option<Element<'_, Message>> {
    let (_, photo) = app.store.current_photo()?;
    let picture = match app.previews.get(&photo.id) {
        Some(PreviewState::Loaded(handle)) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(SIDEBAR_PREVIEW_HEIGHT))
            .content_fit(ContentFit::Cover)
            .into(),
        _ => skeleton(Length::Fill, SIDEBAR_PREVIEW_HEIGHT),
    };
    Some(
        container(column![picture, text(&photo.name).size(12)].spacing(4))
            .padding(8)
            .style(style::card())
            .into(),
    )
}

fn gallery(app: &LightboxUI) -> Element<'_, Message> {
    let mut page = column![toolbar(app)].spacing(8);
    if app.filters_open {
        page = page.push(tag_panel(app));
    }
    if app.faces_open {
        page = page.push(face_panel(app));
    }
    page = page.push(photo_grid(app));

    container(page)
        .padding(crate::CONTENT_PADDING)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn count_badge<'a>(count: usize) -> Element<'a, Message> {
    container(text(count).size(11))
        .padding([0, 6])
        .style(style::badge())
        .into()
}

fn toolbar(app: &LightboxUI) -> Element<'_, Message> {
    let title = app
        .store
        .current_folder()
        .map(|f| sidebar::ellipsis_path(&f.path))
        .unwrap_or_default();

    let faces = button(
        row![text("Faces"), count_badge(app.store.face_clusters().face_count())]
            .spacing(6)
            .align_items(Alignment::Center),
    )
    .style(style::flat_button(app.faces_open))
    .on_press(Message::ToggleFacesPanel);

    let mut filters_label = row![text("Filters")].spacing(6).align_items(Alignment::Center);
    if !app.store.selected_tags().is_empty() {
        filters_label = filters_label.push(count_badge(app.store.selected_tags().len()));
    }
    let filters = button(filters_label)
        .style(style::flat_button(app.filters_open))
        .on_press(Message::ToggleFiltersPanel);

    row![
        text(title).size(18),
        text(format!("{} photos", app.store.photos().len()))
            .size(13)
            .style(Palette::MUTED),
        Space::with_width(Length::Fill),
        faces,
        filters,
        text(format!("{} per row", app.grid.pending_columns)).size(13),
        slider(
            grid::MIN_COLUMNS..=grid::MAX_COLUMNS,
            app.grid.pending_columns,
            Message::GridSizeChanged
        )
        .on_release(Message::GridSizeCommitted)
        .width(Length::Fixed(160.0)),
    ]
    .spacing(12)
    .height(Length::Fixed(crate::TOOLBAR_HEIGHT - 8.0))
    .align_items(Alignment::Center)
    .into()
}

fn tag_panel(app: &LightboxUI) -> Element<'_, Message> {
    let available = app.store.tags();
    if available.is_empty() {
        return text("No tags for this folder yet")
            .size(13)
            .style(Palette::MUTED)
            .into();
    }
    let selected = app.store.selected_tags();
    let mut chips = Row::new().spacing(6).align_items(Alignment::Center);
    for tag in available {
        chips = chips.push(
            button(text(tags::capitalize(tag)).size(13))
                .style(style::flat_button(tags::is_selected(selected, tag)))
                .padding([4, 10])
                .on_press(Message::ToggleTag(tag.clone())),
        );
    }
    if !selected.is_empty() {
        chips = chips.push(
            button(text("Clear").size(13))
                .style(style::flat_button(false))
                .on_press(Message::ClearTags),
        );
    }
    scrollable(chips)
        .direction(horizontal())
        .width(Length::Fill)
        .into()
}

fn face_thumb<'a>(app: &'a LightboxUI, directory: &str, face_id: &str) -> Element<'a, Message> {
    match app.face_crops.get(&format!("{}/{}", directory, face_id)) {
        Some(PreviewState::Loaded(handle)) => image(handle.clone())
            .width(FACE_SIZE)
            .height(FACE_SIZE)
            .content_fit(ContentFit::Cover)
            .into(),
        _ => skeleton(FACE_SIZE, FACE_SIZE),
    }
}

fn face_panel(app: &LightboxUI) -> Element<'_, Message> {
    let clusters = faces::sort_clusters(app.store.face_clusters());
    if clusters.iter().all(|d| d.clusters.is_empty()) {
        return text("No faces found")
            .size(13)
            .style(Palette::MUTED)
            .into();
    }

    let mut strip = Row::new().spacing(12).align_items(Alignment::Center);
    for dir in &clusters {
        for cluster in &dir.clusters {
            let expanded = app.face_groups.is_expanded(&dir.directory, &cluster.id);
            let shown = if expanded { cluster.faces.len() } else { 1 };
            let members = cluster
                .faces
                .iter()
                .take(shown)
                .fold(Row::new().spacing(4), |row, face| {
                    row.push(face_thumb(app, &dir.directory, face))
                });
            let mut group = column![members].spacing(4).align_items(Alignment::Center);
            if cluster.faces.len() > 1 {
                group = group.push(count_badge(cluster.faces.len()));
            }
            strip = strip.push(
                button(group)
                    .style(style::flat_button(expanded))
                    .padding(4)
                    .on_press(Message::ToggleFaceCluster(
                        dir.directory.clone(),
                        cluster.id.clone(),
                        cluster.faces.len(),
                    )),
            );
        }
    }
    scrollable(strip)
        .direction(horizontal())
        .width(Length::Fill)
        .into()
}

fn hover_card<'a>(app: &'a LightboxUI, photo: &'a Photo) -> Element<'a, Message> {
    let lines = match app.summaries.get(&photo.id) {
        Some(QueryState::Ready(summary)) => summary::summary_lines(summary),
        Some(QueryState::Failed(_)) => vec![photo.name.clone(), "No metadata".to_string()],
        _ => vec![photo.name.clone(), "Loading metadata...".to_string()],
    };
    let body = lines
        .into_iter()
        .fold(Column::new().spacing(2), |col, line| col.push(text(line).size(12)));
    container(body).padding(8).style(style::card()).into()
}

fn grid_cell<'a>(app: &'a LightboxUI, index: usize, photo: &'a Photo) -> Element<'a, Message> {
    let content: Element<'a, Message> = match app.previews.get(&photo.id) {
        Some(PreviewState::Loaded(handle)) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Cover)
            .into(),
        Some(PreviewState::Failed) => container(text(&photo.name).size(12))
            .center_x()
            .center_y()
            .width(Length::Fill)
            .height(Length::Fill)
            .style(style::skeleton())
            .into(),
        _ => skeleton(Length::Fill, Length::Fill),
    };
    let selected = app.selected_index() == Some(index);
    let tile = button(content)
        .padding(0)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(style::thumbnail_button(selected))
        .on_press(Message::OpenPhoto(index));
    tooltip(tile, hover_card(app, photo), tooltip::Position::FollowCursor).into()
}

/// Only rows near the viewport are built; spacers stand in for the rest so
/// the scroll extent matches the full grid.
fn photo_grid(app: &LightboxUI) -> Element<'_, Message> {
    let photos = app.store.photos();
    if photos.is_empty() {
        let note = if app.pending_photos_ticket().is_some() {
            "Loading photos..."
        } else {
            "No photos match"
        };
        return container(text(note).style(Palette::MUTED))
            .center_x()
            .center_y()
            .width(Length::Fill)
            .height(Length::Fill)
            .into();
    }

    let columns = app.grid.columns;
    let row_height = app.grid.row_height();
    let pitch = row_height + grid::GAP;
    let total_rows = grid::row_count(photos.len(), columns);
    let rows = app.grid.visible_rows(photos.len());

    let mut body = Column::new().push(Space::with_height(rows.start as f32 * pitch));
    for r in rows.clone() {
        let mut line = Row::new()
            .spacing(grid::GAP)
            .height(Length::Fixed(row_height));
        for c in 0..columns as usize {
            line = match grid::cell_index(r, c, columns, photos.len()) {
                Some(i) => line.push(grid_cell(app, i, &photos[i])),
                None => line.push(Space::new(Length::Fill, Length::Fill)),
            };
        }
        body = body.push(line).push(Space::with_height(grid::GAP));
    }
    body = body.push(Space::with_height((total_rows - rows.end) as f32 * pitch));

    scrollable(body)
        .id(grid_scroll_id())
        .on_scroll(Message::GridScrolled)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn carousel_view(app: &LightboxUI) -> Element<'_, Message> {
    let Some((index, photo)) = app.store.current_photo() else {
        return Space::new(Length::Fill, Length::Fill).into();
    };
    let total = app.store.photos().len();
    let background = app.carousel.background;

    let slide: Element<'_, Message> = match (app.full_images.get(&photo.id), app.previews.get(&photo.id)) {
        (Some(handle), _) | (None, Some(PreviewState::Loaded(handle))) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Contain)
            .into(),
        _ => container(text("Loading...").size(14))
            .center_x()
            .center_y()
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
    };

    let mut slide_area = column![mouse_area(
        container(slide).width(Length::Fill).height(Length::Fill)
    )
    .on_right_press(Message::SlideContext)]
    .spacing(8)
    .width(Length::Fill)
    .height(Length::Fill);
    if app.carousel.menu_open {
        slide_area = slide_area.push(slide_menu(app));
    }

    let stage = row![
        button(text("<").size(28))
            .style(style::flat_button(false))
            .on_press(Message::CarouselPrevious),
        slide_area,
        button(text(">").size(28))
            .style(style::flat_button(false))
            .on_press(Message::CarouselNext),
    ]
    .spacing(8)
    .align_items(Alignment::Center)
    .height(Length::Fill);

    let info = row![
        text(format!("{} / {}  {}", index + 1, total, photo.name)).size(14),
        Space::with_width(Length::Fill),
        button(text("Background"))
            .style(style::flat_button(false))
            .on_press(Message::CycleBackground),
        button(text(if app.carousel.fullscreen {
            "Exit fullscreen"
        } else {
            "Fullscreen"
        }))
        .style(style::flat_button(false))
        .on_press(Message::ToggleFullscreen),
        button(text("Close"))
            .style(style::primary_button())
            .on_press(Message::CloseCarousel),
    ]
    .spacing(8)
    .align_items(Alignment::Center);

    let mut page = column![info, stage].spacing(8).padding(12);
    if !app.carousel.fullscreen {
        page = page.push(thumbnail_strip(app, index));
    }

    container(page)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(style::matte(background.color(), background.text_color()))
        .into()
}

fn slide_menu(app: &LightboxUI) -> Element<'_, Message> {
    let mut menu = column![button(text(if app.carousel.fullscreen {
        "Exit fullscreen"
    } else {
        "Enter fullscreen"
    }))
    .style(style::flat_button(false))
    .width(Length::Fill)
    .on_press(Message::ToggleFullscreen)]
    .spacing(4)
    .width(Length::Fixed(180.0));
    for background in Background::ALL {
        let active = background == app.carousel.background;
        let label = if active {
            format!("\u{2713} {}", background.label())
        } else {
            format!("   {}", background.label())
        };
        menu = menu.push(
            button(text(label))
                .style(style::flat_button(active))
                .width(Length::Fill)
                .on_press(Message::SetBackground(background)),
        );
    }
    menu = menu.push(
        button(text("Cancel"))
            .style(style::flat_button(false))
            .width(Length::Fill)
            .on_press(Message::CloseSlideMenu),
    );
    container(menu).padding(8).style(style::card()).into()
}

fn thumbnail_strip(app: &LightboxUI, current: usize) -> Element<'_, Message> {
    let mut strip = Row::new().spacing(THUMB_SPACING);
    for (i, photo) in app.store.photos().iter().enumerate() {
        let content = match app.previews.get(&photo.id) {
            Some(PreviewState::Loaded(handle)) => image(handle.clone())
                .width(THUMB_WIDTH)
                .height(THUMB_WIDTH)
                .content_fit(ContentFit::Cover)
                .into(),
            _ => skeleton(THUMB_WIDTH, THUMB_WIDTH),
        };
        strip = strip.push(
            button(content)
                .padding(0)
                .style(style::thumbnail_button(i == current))
                .on_press(Message::CarouselGoTo(i)),
        );
    }
    scrollable(strip)
        .id(thumbnail_strip_id())
        .direction(horizontal())
        .width(Length::Fill)
        .into()
}

fn preview_toast(app: &LightboxUI) -> Option<Element<'_, Message>> {
    let toast = app.notifier.active()?;
    let label = if toast.complete {
        "Previews ready".to_string()
    } else {
        format!("Generating previews... {:.0}%", toast.progress)
    };
    Some(
        container(
            column![
                text(label).size(14),
                progress_bar(0.0..=100.0, toast.progress).height(Length::Fixed(6.0)),
            ]
            .spacing(6),
        )
        .padding(12)
        .width(Length::Fixed(280.0))
        .style(style::card())
        .into(),
    )
}
