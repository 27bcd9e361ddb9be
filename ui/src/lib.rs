//! Desktop user interface for the Lightbox photo browser.

pub mod carousel;
pub mod faces;
pub mod grid;
mod image_loader;
pub mod notifier;
pub mod router;
pub mod sidebar;
pub mod store;
mod style;
pub mod summary;
pub mod tags;
mod views;

pub use image_loader::{ImageLoader, ImageLoaderError};
pub use router::{Route, Router};
pub use store::{Action, Store};

use api_client::{
    ApiClient, EventGuard, EventSubscription, FaceClusters, Folder, Photo, PhotoData,
    PhotoSummary, PreviewEvent,
};
use cache::{KeyValueStore, QueryCache, SessionStore, Ticket};
use carousel::{CarouselCommand, CarouselState};
use faces::FaceGroupsState;
use grid::GridState;
use iced::keyboard::{self, Key};
use iced::widget::image::Handle;
use iced::widget::scrollable::{self, AbsoluteOffset, Viewport};
use iced::{
    event, executor, subscription, window, Application, Command, Element, Event, Settings, Size,
    Subscription, Theme,
};
use notifier::PreviewNotifier;
use rfd::AsyncFileDialog;
use sidebar::SidebarState;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Duration};

const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);
/// Thumbnails on each side of the current slide whose previews are loaded.
const STRIP_PRELOAD: usize = 12;
const CONTENT_PADDING: f32 = 16.0;
const TOOLBAR_HEIGHT: f32 = 56.0;

type EventReceiver = Arc<Mutex<mpsc::UnboundedReceiver<PreviewEvent>>>;

/// Cache key of a photo listing: folder path plus active tag filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotosKey {
    pub path: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum PreviewState {
    Loading,
    Loaded(Handle),
    Failed,
}

/// Everything the UI needs from the binary that launches it.
pub struct UiFlags {
    pub client: ApiClient,
    pub events: Option<EventSubscription>,
    pub previews_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub local_store: Arc<dyn KeyValueStore>,
    pub session_store: Arc<dyn KeyValueStore>,
    pub grid_size_per_directory: bool,
    pub initial_route: Route,
}

impl UiFlags {
    /// Flags with in-memory stores and no event stream.
    pub fn new(client: ApiClient, previews_dir: PathBuf, cache_dir: PathBuf) -> Self {
        Self {
            client,
            events: None,
            previews_dir,
            cache_dir,
            local_store: Arc::new(SessionStore::new()),
            session_store: Arc::new(SessionStore::new()),
            grid_size_per_directory: false,
            initial_route: Route::Home,
        }
    }
}

#[cfg_attr(feature = "trace-spans", tracing::instrument(skip(flags)))]
pub fn run(flags: UiFlags) -> iced::Result {
    LightboxUI::run(Settings {
        window: window::Settings {
            size: Size::new(1280.0, 820.0),
            ..Default::default()
        },
        ..Settings::with_flags(flags)
    })
}

#[derive(Debug, Clone)]
pub enum Message {
    LoadFolders,
    FoldersLoaded(Ticket<()>, Result<Vec<Folder>, String>),
    SelectFolder(Folder),
    FolderContext(Folder),
    CloseContextMenu,
    ToggleGroup(String),
    ImportFolder,
    FolderPicked(Option<String>),
    FolderAdded(Result<Folder, String>),
    DeleteFolder(Folder),
    FolderDeleted(Folder, Result<(), String>),
    PhotosLoaded(Ticket<PhotosKey>, Result<PhotoData, String>),
    FacesLoaded(Ticket<String>, Result<FaceClusters, String>),
    SummariesLoaded(Vec<Ticket<String>>, Result<Vec<PhotoSummary>, String>),
    PreviewLoaded(String, Result<Handle, String>),
    FullImageLoaded(String, Result<Handle, String>),
    FaceLoaded(String, Result<Handle, String>),
    ToggleTag(String),
    ClearTags,
    ToggleFiltersPanel,
    ToggleFacesPanel,
    ToggleFaceCluster(String, String, usize),
    GridSizeChanged(u16),
    GridSizeCommitted,
    GridScrolled(Viewport),
    OpenPhoto(usize),
    CarouselGoTo(usize),
    CarouselNext,
    CarouselPrevious,
    CloseCarousel,
    ToggleFullscreen,
    CycleBackground,
    SetBackground(carousel::Background),
    SlideContext,
    CloseSlideMenu,
    KeyPressed(Key),
    WindowResized { width: u32, height: u32 },
    WindowModeFetched(window::Mode),
    PreviewEvent(PreviewEvent),
    EventsClosed,
    DismissToast(u64),
    DismissError(usize),
    ClearErrors,
}

pub struct LightboxUI {
    client: ApiClient,
    loader: ImageLoader,
    store: Store,
    router: Router,
    folders: QueryCache<(), Vec<Folder>>,
    photo_queries: QueryCache<PhotosKey, PhotoData>,
    summaries: QueryCache<String, PhotoSummary>,
    face_queries: QueryCache<String, FaceClusters>,
    previews: HashMap<String, PreviewState>,
    full_images: HashMap<String, Handle>,
    full_pending: HashSet<String>,
    face_crops: HashMap<String, PreviewState>,
    sidebar: SidebarState,
    grid: GridState,
    carousel: CarouselState,
    face_groups: FaceGroupsState,
    notifier: PreviewNotifier,
    filters_open: bool,
    faces_open: bool,
    local_store: Arc<dyn KeyValueStore>,
    session_store: Arc<dyn KeyValueStore>,
    grid_size_per_directory: bool,
    event_receiver: Option<EventReceiver>,
    _event_guard: Option<EventGuard>,
    window_size: Option<(f32, f32)>,
    errors: Vec<String>,
    error_log_path: PathBuf,
}

impl LightboxUI {
    pub fn route(&self) -> &Route {
        self.router.current()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn photo_count(&self) -> usize {
        self.store.photos().len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.store.current_photo().map(|(i, _)| i)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn toast_id(&self) -> Option<u64> {
        self.notifier.active().map(|t| t.id)
    }

    pub fn toast_progress(&self) -> Option<f32> {
        self.notifier.active().map(|t| t.progress)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.carousel.fullscreen
    }

    pub fn background(&self) -> carousel::Background {
        self.carousel.background
    }

    pub fn is_slide_menu_open(&self) -> bool {
        self.carousel.menu_open
    }

    pub fn grid_columns(&self) -> u16 {
        self.grid.columns
    }

    pub fn context_target(&self) -> Option<&Folder> {
        self.sidebar.context_target()
    }

    pub fn is_cluster_expanded(&self, directory: &str, cluster: &str) -> bool {
        self.face_groups.is_expanded(directory, cluster)
    }

    /// Ids of photos currently holding a decoded full-size image, sorted.
    pub fn full_image_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.full_images.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ids with a full-size image load in flight, sorted.
    pub fn pending_full_image_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.full_pending.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn preview_loaded(&self, photo_id: &str) -> bool {
        matches!(self.previews.get(photo_id), Some(PreviewState::Loaded(_)))
    }

    pub fn preview_requested(&self, photo_id: &str) -> bool {
        self.previews.contains_key(photo_id)
    }

    pub fn folders_ticket(&self) -> Option<Ticket<()>> {
        self.folders.latest_ticket(&())
    }

    pub fn pending_photos_ticket(&self) -> Option<Ticket<PhotosKey>> {
        self.active_photos_key()
            .and_then(|key| self.photo_queries.latest_ticket(&key))
    }

    pub fn pending_faces_ticket(&self) -> Option<Ticket<String>> {
        let id = self.store.current_folder()?.id.clone();
        self.face_queries.latest_ticket(&id)
    }

    pub fn pending_summary_tickets(&self) -> Vec<Ticket<String>> {
        self.store
            .photos()
            .iter()
            .filter_map(|p| self.summaries.latest_ticket(&p.id))
            .collect()
    }

    pub fn summary(&self, photo_id: &str) -> Option<&PhotoSummary> {
        self.summaries.data(&photo_id.to_string())
    }

    pub fn active_photos_key(&self) -> Option<PhotosKey> {
        let folder = self.store.current_folder()?;
        Some(PhotosKey {
            path: folder.path.clone(),
            tags: self.store.selected_tags().to_vec(),
        })
    }

    fn current_directory_id(&self) -> Option<String> {
        self.store.current_folder().map(|f| f.id.clone())
    }

    fn grid_scope(&self) -> Option<String> {
        if self.grid_size_per_directory {
            self.current_directory_id()
        } else {
            None
        }
    }

    fn carousel_open(&self) -> bool {
        matches!(self.router.current(), Route::Photo { .. }) && self.store.current_photo().is_some()
    }

    fn log_error(&self, msg: &str) {
        tracing::error!("{}", msg);
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.error_log_path)
        {
            let _ = writeln!(file, "{}", msg);
        }
    }

    fn error_timeout() -> Command<Message> {
        Command::perform(
            async {
                sleep(ERROR_DISPLAY_DURATION).await;
            },
            |_| Message::ClearErrors,
        )
    }

    fn report_error(&mut self, msg: String) -> Command<Message> {
        self.log_error(&msg);
        self.errors.push(msg);
        Self::error_timeout()
    }

    fn load_folders(&mut self) -> Command<Message> {
        if self.folders.is_fetching(&()) {
            return Command::none();
        }
        let ticket = self.folders.begin(());
        let client = self.client.clone();
        Command::perform(
            async move { client.get_folders().await.map_err(|e| e.to_string()) },
            move |result| Message::FoldersLoaded(ticket.clone(), result),
        )
    }

    fn select_folder(&mut self, folder: Folder, navigate: bool) -> Command<Message> {
        tracing::info!("Selecting folder {} ({})", folder.id, folder.path);
        let id = folder.id.clone();
        self.store.dispatch(Action::SetPath(folder));
        self.store.dispatch(Action::ClearSelectedTags);
        self.store.dispatch(Action::ClearSelectedPhotos);
        self.face_groups.collapse_all();
        self.full_images.clear();
        self.full_pending.clear();

        let scope = self.grid_scope();
        self.grid
            .set_columns(grid::load_grid_size(self.local_store.as_ref(), scope.as_deref()));
        self.grid.scroll_offset = grid::load_scroll_offset(self.session_store.as_ref(), Some(id.as_str()));

        if navigate {
            self.router.push(Route::folder(id));
        }

        Command::batch(vec![
            self.request_photos(),
            self.request_faces(),
            self.restore_scroll(),
        ])
    }

    fn restore_scroll(&self) -> Command<Message> {
        scrollable::scroll_to(
            views::grid_scroll_id(),
            AbsoluteOffset {
                x: 0.0,
                y: self.grid.scroll_offset,
            },
        )
    }

    /// Show whatever is cached for the active key and fetch it if needed.
    fn request_photos(&mut self) -> Command<Message> {
        let Some(key) = self.active_photos_key() else {
            return Command::none();
        };
        match self.photo_queries.data(&key).cloned() {
            Some(data) => self.apply_photo_data(data),
            None => {
                self.store.dispatch(Action::SetPhotos(Vec::new()));
            }
        }

        let mut commands = vec![self.load_visible()];
        if self.photo_queries.needs_fetch(&key) {
            let ticket = self.photo_queries.begin(key.clone());
            let client = self.client.clone();
            tracing::debug!(path = %key.path, tags = ?key.tags, "requesting photos");
            commands.push(Command::perform(
                async move {
                    client
                        .get_photos_from_path(&key.path, &key.tags)
                        .await
                        .map_err(|e| e.to_string())
                },
                move |result| Message::PhotosLoaded(ticket.clone(), result),
            ));
        }
        Command::batch(commands)
    }

    fn apply_photo_data(&mut self, data: PhotoData) {
        self.store.dispatch(Action::SetPhotos(data.photos));
        self.store.dispatch(Action::SetTags(data.tags));
        self.resolve_deep_link();
    }

    /// Select the photo named by the route, if any. Unknown names are ignored.
    fn resolve_deep_link(&mut self) {
        let Route::Photo {
            directory,
            photo_name,
        } = self.router.current().clone()
        else {
            return;
        };
        if self.current_directory_id().as_deref() != Some(directory.as_str()) {
            return;
        }
        if let Some(index) = self.store.index_of_name(&photo_name) {
            let photo = self.store.photos()[index].clone();
            self.store.dispatch(Action::SetSelectedPhoto { photo, index });
        } else {
            tracing::debug!("No photo named {} in {}", photo_name, directory);
        }
    }

    fn request_faces(&mut self) -> Command<Message> {
        let Some((id, path)) = self
            .store
            .current_folder()
            .map(|f| (f.id.clone(), f.path.clone()))
        else {
            return Command::none();
        };
        match self.face_queries.data(&id).cloned() {
            Some(clusters) => self.store.dispatch(Action::SetFaceClusters(clusters)),
            None => self
                .store
                .dispatch(Action::SetFaceClusters(FaceClusters::default())),
        }
        if !self.face_queries.needs_fetch(&id) {
            return Command::none();
        }
        let ticket = self.face_queries.begin(id.clone());
        let client = self.client.clone();
        Command::perform(
            async move {
                let dirs = vec![path];
                client
                    .get_face_clusters(Some(dirs.as_slice()))
                    .await
                    .map_err(|e| e.to_string())
            },
            move |result| Message::FacesLoaded(ticket.clone(), result),
        )
    }

    fn load_preview(&mut self, photo: &Photo) -> Command<Message> {
        let Some(directory) = self.current_directory_id() else {
            return Command::none();
        };
        self.previews
            .insert(photo.id.clone(), PreviewState::Loading);
        let loader = self.loader.clone();
        let photo_id = photo.id.clone();
        let result_id = photo.id.clone();
        Command::perform(
            async move {
                loader
                    .load_preview(&directory, &photo_id)
                    .await
                    .map_err(|e| e.to_string())
            },
            move |result| Message::PreviewLoaded(result_id.clone(), result),
        )
    }

    fn load_previews<I>(&mut self, indices: I, retry_failed: bool) -> Command<Message>
    where
        I: IntoIterator<Item = usize>,
    {
        let photos: Vec<Photo> = indices
            .into_iter()
            .filter_map(|i| self.store.photos().get(i).cloned())
            .filter(|p| match self.previews.get(&p.id) {
                None => true,
                Some(PreviewState::Failed) => retry_failed,
                Some(_) => false,
            })
            .collect();
        Command::batch(photos.iter().map(|p| self.load_preview(p)).collect::<Vec<_>>())
    }

    /// Previews and hover metadata for cells on screen.
    fn load_visible(&mut self) -> Command<Message> {
        let on_screen = self.grid.on_screen(self.store.photos().len());
        Command::batch(vec![
            self.load_previews(on_screen.clone(), false),
            self.load_summaries(on_screen),
        ])
    }

    fn load_summaries(&mut self, indices: std::ops::Range<usize>) -> Command<Message> {
        let ids: Vec<String> = indices
            .filter_map(|i| self.store.photos().get(i).map(|p| p.id.clone()))
            .filter(|id| self.summaries.needs_fetch(id))
            .collect();
        if ids.is_empty() {
            return Command::none();
        }
        let tickets: Vec<Ticket<String>> =
            ids.iter().map(|id| self.summaries.begin(id.clone())).collect();
        let client = self.client.clone();
        Command::perform(
            async move {
                client
                    .get_basic_metadata(&ids)
                    .await
                    .map_err(|e| e.to_string())
            },
            move |result| Message::SummariesLoaded(tickets.clone(), result),
        )
    }

    fn load_face(&mut self, directory: &str, face_id: &str) -> Command<Message> {
        let key = format!("{}/{}", directory, face_id);
        if self.face_crops.contains_key(&key) {
            return Command::none();
        }
        self.face_crops.insert(key.clone(), PreviewState::Loading);
        let loader = self.loader.clone();
        let directory = directory.to_string();
        let face_id = face_id.to_string();
        Command::perform(
            async move {
                loader
                    .load_face(&directory, &face_id)
                    .await
                    .map_err(|e| e.to_string())
            },
            move |result| Message::FaceLoaded(key.clone(), result),
        )
    }

    /// Crops for the lead face of every cluster plus members of open ones.
    fn load_face_crops(&mut self) -> Command<Message> {
        if !self.faces_open {
            return Command::none();
        }
        let mut wanted: Vec<(String, String)> = Vec::new();
        for dir in self.store.face_clusters().directories() {
            for cluster in &dir.clusters {
                let expanded = self.face_groups.is_expanded(&dir.directory, &cluster.id);
                let take = if expanded { cluster.faces.len() } else { 1 };
                for face in cluster.faces.iter().take(take) {
                    wanted.push((dir.directory.clone(), face.clone()));
                }
            }
        }
        Command::batch(
            wanted
                .iter()
                .map(|(dir, face)| self.load_face(dir, face))
                .collect::<Vec<_>>(),
        )
    }

    /// Keep full-size images only for the lazy window and fetch what is
    /// missing from it.
    fn sync_lazy_window(&mut self) -> Command<Message> {
        let Some((index, _)) = self.store.current_photo() else {
            self.full_images.clear();
            self.full_pending.clear();
            return Command::none();
        };
        let Some(folder_path) = self.store.current_path().map(str::to_string) else {
            return Command::none();
        };
        let photos = self.store.photos();
        let window: Vec<Photo> = carousel::lazy_window(index, photos.len())
            .into_iter()
            .map(|i| photos[i].clone())
            .collect();
        let keep: HashSet<&str> = window.iter().map(|p| p.id.as_str()).collect();
        self.full_images.retain(|id, _| keep.contains(id.as_str()));
        self.full_pending.retain(|id| keep.contains(id.as_str()));

        let mut commands = Vec::new();
        for photo in &window {
            if self.full_images.contains_key(&photo.id) || self.full_pending.contains(&photo.id) {
                continue;
            }
            self.full_pending.insert(photo.id.clone());
            let loader = self.loader.clone();
            let folder_path = folder_path.clone();
            let name = photo.name.clone();
            let id = photo.id.clone();
            commands.push(Command::perform(
                async move {
                    loader
                        .load_full_image(&folder_path, &name)
                        .await
                        .map_err(|e| e.to_string())
                },
                move |result| Message::FullImageLoaded(id.clone(), result),
            ));
        }
        Command::batch(commands)
    }

    /// Route, lazy window, thumbnail strip and previews after the carousel
    /// index moved.
    fn on_index_change(&mut self) -> Command<Message> {
        let Some((index, photo)) = self.store.current_photo() else {
            return Command::none();
        };
        let name = photo.name.clone();
        let len = self.store.photos().len();
        if let Some(directory) = self.current_directory_id() {
            self.router.replace(Route::photo(directory, name));
        }

        let viewport = self.window_size.map(|(w, _)| w).unwrap_or(1280.0);
        let strip_offset = carousel::thumbnail_offset(
            index,
            views::THUMB_WIDTH,
            views::THUMB_SPACING,
            viewport,
        );
        let start = index.saturating_sub(STRIP_PRELOAD);
        let end = (index + STRIP_PRELOAD + 1).min(len);

        Command::batch(vec![
            self.sync_lazy_window(),
            self.load_previews(start..end, false),
            scrollable::scroll_to(
                views::thumbnail_strip_id(),
                AbsoluteOffset {
                    x: strip_offset,
                    y: 0.0,
                },
            ),
        ])
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Command<Message> {
        self.carousel.fullscreen = fullscreen;
        let mode = if fullscreen {
            window::Mode::Fullscreen
        } else {
            window::Mode::Windowed
        };
        window::change_mode(window::Id::MAIN, mode)
    }

    fn close_carousel(&mut self) -> Command<Message> {
        let exit = if self.carousel.fullscreen {
            self.set_fullscreen(false)
        } else {
            Command::none()
        };
        self.carousel.menu_open = false;
        self.full_images.clear();
        self.full_pending.clear();
        if let Some(directory) = self.current_directory_id() {
            let folder_route = Route::folder(directory);
            if self.router.depth() > 1 {
                self.router.back();
            }
            if self.router.current() != &folder_route {
                self.router.replace(folder_route);
            }
        }
        Command::batch(vec![exit, self.restore_scroll(), self.load_visible()])
    }

    fn run_carousel_command(&mut self, command: CarouselCommand) -> Command<Message> {
        match command {
            CarouselCommand::Next => self.update(Message::CarouselNext),
            CarouselCommand::Previous => self.update(Message::CarouselPrevious),
            CarouselCommand::EnterFullscreen => self.set_fullscreen(true),
            CarouselCommand::ExitFullscreen => self.set_fullscreen(false),
            CarouselCommand::Close => self.close_carousel(),
            CarouselCommand::CycleBackground => self.update(Message::CycleBackground),
        }
    }

    fn on_folders_loaded(&mut self, folders: Vec<Folder>) -> Command<Message> {
        if folders.is_empty() {
            tracing::info!("No folders imported yet");
            self.store.dispatch(Action::ClearPath);
            self.store.dispatch(Action::SetPhotos(Vec::new()));
            self.router.push(Route::Launch);
            return Command::none();
        }

        if let Some(current) = self.store.current_folder() {
            if let Some(fresh) = folders.iter().find(|f| f.id == current.id) {
                let fresh = fresh.clone();
                self.store.dispatch(Action::SetPath(fresh));
                if matches!(self.router.current(), Route::Launch | Route::Home) {
                    let id = self.current_directory_id().unwrap_or_default();
                    self.router.push(Route::folder(id));
                }
                return self.request_photos();
            }
        }

        // Honour a folder named by the route, else fall back to the first one.
        let routed = self
            .router
            .current()
            .directory()
            .and_then(|dir| folders.iter().find(|f| f.id == dir))
            .cloned();
        match routed {
            Some(folder) => self.select_folder(folder, false),
            None => {
                let first = folders[0].clone();
                self.select_folder(first, true)
            }
        }
    }
}

impl Application for LightboxUI {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = UiFlags;

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(flags)))]
    fn new(flags: UiFlags) -> (Self, Command<Message>) {
        let error_log_path = flags.cache_dir.join("ui_errors.log");
        let (event_receiver, event_guard) = match flags.events {
            Some(subscription) => {
                let (rx, guard) = subscription.into_parts();
                (Some(Arc::new(Mutex::new(rx))), Some(guard))
            }
            None => (None, None),
        };

        let mut grid = GridState::default();
        grid.set_columns(grid::load_grid_size(flags.local_store.as_ref(), None));

        let mut app = Self {
            client: flags.client,
            loader: ImageLoader::new(flags.previews_dir.clone()),
            store: Store::new(flags.previews_dir),
            router: Router::new(flags.initial_route),
            folders: QueryCache::new(),
            photo_queries: QueryCache::new(),
            summaries: QueryCache::new(),
            face_queries: QueryCache::new(),
            previews: HashMap::new(),
            full_images: HashMap::new(),
            full_pending: HashSet::new(),
            face_crops: HashMap::new(),
            sidebar: SidebarState::default(),
            grid,
            carousel: CarouselState::default(),
            face_groups: FaceGroupsState::default(),
            notifier: PreviewNotifier::new(),
            filters_open: false,
            faces_open: false,
            local_store: flags.local_store,
            session_store: flags.session_store,
            grid_size_per_directory: flags.grid_size_per_directory,
            event_receiver,
            _event_guard: event_guard,
            window_size: None,
            errors: Vec::new(),
            error_log_path,
        };
        let command = app.load_folders();
        (app, command)
    }

    fn title(&self) -> String {
        match self.store.current_folder() {
            Some(folder) => format!("Lightbox - {}", sidebar::ellipsis_path(&folder.path)),
            None => String::from("Lightbox"),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::LoadFolders => return self.load_folders(),
            Message::FoldersLoaded(ticket, result) => {
                let outcome = result.clone();
                if !self.folders.complete(&ticket, result) {
                    tracing::debug!("Dropping superseded folder list");
                    return Command::none();
                }
                match outcome {
                    Ok(folders) => return self.on_folders_loaded(folders),
                    Err(e) => {
                        self.router.push(Route::Launch);
                        return self.report_error(format!("Failed to load folders: {}", e));
                    }
                }
            }
            Message::SelectFolder(folder) => {
                self.sidebar.clear_context_target();
                return self.select_folder(folder, true);
            }
            Message::FolderContext(folder) => {
                self.sidebar.set_context_target(folder);
            }
            Message::CloseContextMenu => {
                self.sidebar.clear_context_target();
            }
            Message::ToggleGroup(name) => {
                self.sidebar.toggle_group(&name);
            }
            Message::ImportFolder => {
                self.sidebar.clear_context_target();
                return Command::perform(
                    async {
                        AsyncFileDialog::new()
                            .set_title("Import folder")
                            .pick_folder()
                            .await
                            .map(|handle| handle.path().to_string_lossy().to_string())
                    },
                    Message::FolderPicked,
                );
            }
            Message::FolderPicked(Some(path)) => {
                let client = self.client.clone();
                return Command::perform(
                    async move { client.add_folder(&path).await.map_err(|e| e.to_string()) },
                    Message::FolderAdded,
                );
            }
            Message::FolderPicked(None) => {}
            Message::FolderAdded(result) => match result {
                Ok(folder) => {
                    tracing::info!("Imported folder {}", folder.path);
                    self.folders.invalidate_all();
                    self.photo_queries.invalidate_all();
                    let reload = self.load_folders();
                    let select = self.select_folder(folder, true);
                    return Command::batch(vec![reload, select]);
                }
                Err(e) => return self.report_error(format!("Failed to import folder: {}", e)),
            },
            Message::DeleteFolder(folder) => {
                self.sidebar.clear_context_target();
                let client = self.client.clone();
                let path = folder.path.clone();
                return Command::perform(
                    async move { client.delete_folder(&path).await.map_err(|e| e.to_string()) },
                    move |result| Message::FolderDeleted(folder.clone(), result),
                );
            }
            Message::FolderDeleted(folder, result) => match result {
                Ok(()) => {
                    tracing::info!("Removed folder {}", folder.path);
                    let path = folder.path.clone();
                    self.photo_queries.invalidate(|key| key.path == path);
                    self.face_queries.remove(&folder.id);
                    self.folders.invalidate_all();
                    if self.current_directory_id().as_deref() == Some(folder.id.as_str()) {
                        self.store.dispatch(Action::ClearPath);
                        self.store.dispatch(Action::ClearSelectedPhotos);
                        self.store.dispatch(Action::SetPhotos(Vec::new()));
                        self.store
                            .dispatch(Action::SetFaceClusters(FaceClusters::default()));
                        self.router.push(Route::Home);
                    }
                    return self.load_folders();
                }
                Err(e) => return self.report_error(format!("Failed to delete folder: {}", e)),
            },
            Message::PhotosLoaded(ticket, result) => {
                let error = result.as_ref().err().cloned();
                let data = result.as_ref().ok().cloned();
                if !self.photo_queries.complete(&ticket, result) {
                    tracing::debug!(path = %ticket.key.path, "Dropping superseded photo list");
                    return Command::none();
                }
                if self.active_photos_key().as_ref() != Some(&ticket.key) {
                    // Cached for later, but not for the folder on screen.
                    return Command::none();
                }
                if let Some(e) = error {
                    return self.report_error(format!("Failed to load photos: {}", e));
                }
                if let Some(data) = data {
                    tracing::info!("Loaded {} photos from {}", data.photos.len(), ticket.key.path);
                    self.apply_photo_data(data);
                }
                let mut commands = vec![self.load_visible(), self.restore_scroll()];
                if self.carousel_open() {
                    commands.push(self.on_index_change());
                }
                return Command::batch(commands);
            }
            Message::FacesLoaded(ticket, result) => {
                let outcome = result.clone();
                if !self.face_queries.complete(&ticket, result) {
                    return Command::none();
                }
                if self.current_directory_id().as_deref() != Some(ticket.key.as_str()) {
                    return Command::none();
                }
                match outcome {
                    Ok(clusters) => {
                        tracing::debug!("Loaded {} faces", clusters.face_count());
                        self.store.dispatch(Action::SetFaceClusters(clusters));
                        return self.load_face_crops();
                    }
                    Err(e) => tracing::warn!("Failed to load face clusters: {}", e),
                }
            }
            Message::SummariesLoaded(tickets, result) => match result {
                Ok(summaries) => {
                    let mut by_id: HashMap<String, PhotoSummary> =
                        summaries.into_iter().map(|s| (s.id.clone(), s)).collect();
                    for ticket in &tickets {
                        // Photos the backend has nothing for show as "No metadata".
                        let summary = by_id.remove(&ticket.key).unwrap_or_else(|| PhotoSummary {
                            id: ticket.key.clone(),
                            ..Default::default()
                        });
                        self.summaries.complete(ticket, Ok(summary));
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to load photo metadata: {}", e);
                    for ticket in &tickets {
                        self.summaries.complete(ticket, Err(e.clone()));
                    }
                }
            },
            Message::PreviewLoaded(photo_id, result) => {
                let state = match result {
                    Ok(handle) => PreviewState::Loaded(handle),
                    Err(e) => {
                        tracing::debug!("Preview for {} unavailable: {}", photo_id, e);
                        PreviewState::Failed
                    }
                };
                self.previews.insert(photo_id, state);
            }
            Message::FullImageLoaded(photo_id, result) => {
                if !self.full_pending.remove(&photo_id) {
                    // Left the lazy window while loading.
                    return Command::none();
                }
                match result {
                    Ok(handle) => {
                        self.full_images.insert(photo_id, handle);
                    }
                    Err(e) => tracing::debug!("Full image for {} unavailable: {}", photo_id, e),
                }
            }
            Message::FaceLoaded(key, result) => {
                let state = match result {
                    Ok(handle) => PreviewState::Loaded(handle),
                    Err(e) => {
                        tracing::debug!("Face crop {} unavailable: {}", key, e);
                        PreviewState::Failed
                    }
                };
                self.face_crops.insert(key, state);
            }
            Message::ToggleTag(tag) => {
                if tags::is_selected(self.store.selected_tags(), &tag) {
                    self.store.dispatch(Action::RemoveTagFilter(tag));
                } else {
                    self.store.dispatch(Action::AddTagFilter(tag));
                }
                self.store.dispatch(Action::ClearSelectedPhotos);
                return self.request_photos();
            }
            Message::ClearTags => {
                self.store.dispatch(Action::ClearSelectedTags);
                return self.request_photos();
            }
            Message::ToggleFiltersPanel => {
                self.filters_open = !self.filters_open;
            }
            Message::ToggleFacesPanel => {
                self.faces_open = !self.faces_open;
                return self.load_face_crops();
            }
            Message::ToggleFaceCluster(directory, cluster, members) => {
                self.face_groups.toggle(&directory, &cluster, members);
                return self.load_face_crops();
            }
            Message::GridSizeChanged(columns) => {
                self.grid.pending_columns = grid::clamp_columns(columns);
            }
            Message::GridSizeCommitted => {
                let columns = self.grid.pending_columns;
                self.grid.set_columns(columns);
                let scope = self.grid_scope();
                grid::save_grid_size(self.local_store.as_ref(), scope.as_deref(), columns);
                return self.load_visible();
            }
            Message::GridScrolled(viewport) => {
                let bounds = viewport.bounds();
                self.grid.scroll_offset = viewport.absolute_offset().y;
                self.grid.viewport_height = bounds.height;
                self.grid.width = Some(bounds.width);
                if let Some(id) = self.current_directory_id() {
                    grid::save_scroll_offset(
                        self.session_store.as_ref(),
                        Some(id.as_str()),
                        self.grid.scroll_offset,
                    );
                }
                return self.load_visible();
            }
            Message::OpenPhoto(index) => {
                let Some(photo) = self.store.photos().get(index).cloned() else {
                    return Command::none();
                };
                let Some(directory) = self.current_directory_id() else {
                    return Command::none();
                };
                let name = photo.name.clone();
                self.store.dispatch(Action::SetSelectedPhoto { photo, index });
                self.router.push(Route::photo(directory, name));
                return self.on_index_change();
            }
            Message::CarouselGoTo(index) => {
                if let Some(photo) = self.store.photos().get(index).cloned() {
                    self.store.dispatch(Action::SetSelectedPhoto { photo, index });
                    return self.on_index_change();
                }
            }
            Message::CarouselNext => {
                self.store.dispatch(Action::NextPhoto);
                return self.on_index_change();
            }
            Message::CarouselPrevious => {
                self.store.dispatch(Action::PreviousPhoto);
                return self.on_index_change();
            }
            Message::CloseCarousel => return self.close_carousel(),
            Message::ToggleFullscreen => {
                self.carousel.menu_open = false;
                let target = !self.carousel.fullscreen;
                return self.set_fullscreen(target);
            }
            Message::CycleBackground => {
                self.carousel.background = self.carousel.background.next();
            }
            Message::SetBackground(background) => {
                self.carousel.menu_open = false;
                self.carousel.background = background;
            }
            Message::SlideContext => {
                if self.carousel_open() {
                    self.carousel.menu_open = true;
                }
            }
            Message::CloseSlideMenu => {
                self.carousel.menu_open = false;
            }
            Message::KeyPressed(key) => {
                if !self.carousel_open() {
                    return Command::none();
                }
                if let Some(command) = carousel::command_for_key(&key, self.carousel.fullscreen) {
                    return self.run_carousel_command(command);
                }
            }
            Message::WindowResized { width, height } => {
                let (width, height) = (width as f32, height as f32);
                self.window_size = Some((width, height));
                let grid_width = width - style::Palette::SIDEBAR_WIDTH - 2.0 * CONTENT_PADDING;
                if grid_width > 0.0 {
                    self.grid.width = Some(grid_width);
                }
                self.grid.viewport_height = (height - TOOLBAR_HEIGHT - 2.0 * CONTENT_PADDING).max(0.0);
                return Command::batch(vec![
                    window::fetch_mode(window::Id::MAIN, Message::WindowModeFetched),
                    self.load_visible(),
                ]);
            }
            Message::WindowModeFetched(mode) => {
                let actual = mode == window::Mode::Fullscreen;
                if self.carousel.reconcile_fullscreen(actual) {
                    tracing::debug!(fullscreen = actual, "Window mode changed externally");
                }
            }
            Message::PreviewEvent(event) => match event {
                PreviewEvent::Start => {
                    self.notifier.on_start();
                }
                PreviewEvent::Progress(progress) => {
                    self.notifier.on_progress(progress);
                }
                PreviewEvent::End => {
                    let retry = {
                        let on_screen = self.grid.on_screen(self.store.photos().len());
                        self.load_previews(on_screen, true)
                    };
                    if let Some(id) = self.notifier.on_end() {
                        return Command::batch(vec![
                            retry,
                            Command::perform(
                                async {
                                    sleep(notifier::DISMISS_DELAY).await;
                                },
                                move |_| Message::DismissToast(id),
                            ),
                        ]);
                    }
                    return retry;
                }
            },
            Message::EventsClosed => {
                tracing::info!("Backend event stream closed");
                self.event_receiver = None;
            }
            Message::DismissToast(id) => {
                self.notifier.dismiss(id);
            }
            Message::DismissError(index) => {
                if index < self.errors.len() {
                    self.errors.remove(index);
                }
            }
            Message::ClearErrors => {
                self.errors.clear();
            }
        }
        Command::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subs: Vec<Subscription<Message>> = vec![event::listen_with(handle_event)];

        if let Some(receiver) = &self.event_receiver {
            let receiver = receiver.clone();
            subs.push(subscription::unfold(
                "preview-events",
                Some(receiver),
                |state: Option<EventReceiver>| async move {
                    let Some(rx) = state else {
                        return futures::future::pending::<(Message, Option<EventReceiver>)>()
                            .await;
                    };
                    let next = rx.lock().await.recv().await;
                    match next {
                        Some(event) => (Message::PreviewEvent(event), Some(rx)),
                        None => (Message::EventsClosed, None),
                    }
                },
            ));
        }

        Subscription::batch(subs)
    }

    fn view(&self) -> Element<Message> {
        views::root(self)
    }
}

fn handle_event(event: Event, _status: event::Status) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => Some(Message::KeyPressed(key)),
        Event::Window(_, window::Event::Resized { width, height }) => {
            Some(Message::WindowResized { width, height })
        }
        _ => None,
    }
}
