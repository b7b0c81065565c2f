use std::path::Path;

use crate::assistant::{Extraction, FilterExtractor, extract_filter};
use crate::color::ColorMap;
use crate::data::filter::{ActiveFilter, filtered_indices};
use crate::data::loader::{LoadError, SwapRule, load_bytes};
use crate::data::model::CenterTable;
use crate::data::sample::example_table;
use crate::render::map::{MapView, build_map_view};
use crate::render::table::{TableView, build_table_view};

/// Slider upper bound when there is no data to take a maximum from.
const DEFAULT_SLIDER_MAX: f64 = 100.0;

const UPLOADED: &str = "Archivo CSV cargado exitosamente.";

// ---------------------------------------------------------------------------
// Status and chat messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Which slider moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Distance,
    Time,
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one user session carries between interactions, independent
/// of rendering. Each interaction goes through one `on_*` handler.
pub struct Session {
    /// Cleaned table (None after a failed load).
    pub table: Option<CenterTable>,

    pub filter: ActiveFilter,

    /// Chat exchange for the latest query only.
    pub history: Vec<ChatMessage>,

    /// Messages from the last load, shown above the map.
    pub statuses: Vec<StatusMessage>,

    /// Indices of centers passing the current filter (cached).
    pub visible_indices: Vec<usize>,

    /// Marker colour per center type.
    pub color_map: Option<ColorMap>,

    /// Bumped whenever `visible_indices` is recomputed so the map can
    /// recenter.
    pub generation: u64,

    swap_rule: SwapRule,
}

impl Session {
    pub fn new(swap_rule: SwapRule) -> Self {
        Self {
            table: None,
            filter: ActiveFilter::none(),
            history: Vec::new(),
            statuses: Vec::new(),
            visible_indices: Vec::new(),
            color_map: None,
            generation: 0,
            swap_rule,
        }
    }

    // -- Handlers --------------------------------------------------------

    /// A CSV was uploaded: rebuild the table from its bytes.
    pub fn on_file_uploaded(&mut self, bytes: &[u8]) {
        let result = load_bytes(bytes, self.swap_rule);
        self.ingest(result, StatusLevel::Success, UPLOADED);
    }

    /// A CSV was picked from disk: read it and handle it as an upload.
    pub fn on_file_opened(&mut self, path: &Path) {
        match std::fs::read(path) {
            Ok(bytes) => self.on_file_uploaded(&bytes),
            Err(e) => self.ingest(Err(LoadError::Io(e)), StatusLevel::Success, UPLOADED),
        }
    }

    /// No file given: show the built-in example centers.
    pub fn on_sample_requested(&mut self) {
        let result = example_table(self.swap_rule);
        self.ingest(
            result,
            StatusLevel::Info,
            "No se ha cargado ningún archivo CSV. Se muestran datos de ejemplo.",
        );
    }

    /// A chat query was submitted. The extracted filter replaces the active
    /// one outright; when nothing usable comes back the filter is left as it
    /// was. The chat history is replaced by this exchange either way.
    pub fn on_filter_submitted(&mut self, query: &str, extractor: &dyn FilterExtractor) {
        self.history.clear();
        self.history.push(ChatMessage {
            role: Role::User,
            content: query.to_string(),
        });

        let reply = match extract_filter(extractor, query) {
            Extraction::Filter(spec) => {
                log::info!("Chat filter: {spec:?}");
                self.filter = spec.to_filter();
                spec.describe()
            }
            Extraction::UnknownUnit => {
                log::info!("Unsupported unit in {query:?}");
                "No he podido entender tu petición. Por favor, especifica la distancia en \
                 'km' o el tiempo en 'minutos'."
                    .to_string()
            }
            Extraction::Nothing => {
                log::info!("No filter recognized in {query:?}");
                "No he encontrado filtros válidos en tu mensaje. Por favor, intenta una \
                 pregunta como 'Quiero los centros a 50 km'."
                    .to_string()
            }
        };

        self.history.push(ChatMessage {
            role: Role::Assistant,
            content: reply,
        });
        self.refilter();
    }

    /// A threshold slider moved; the other bound is kept.
    pub fn on_threshold_changed(&mut self, which: Threshold, value: f64) {
        match which {
            Threshold::Distance => self.filter.max_distance_km = Some(value),
            Threshold::Time => self.filter.max_time_min = Some(value),
        }
        self.refilter();
    }

    /// "Quitar filtros" pressed: show every center again.
    pub fn on_filter_cleared(&mut self) {
        self.filter = ActiveFilter::none();
        self.refilter();
    }

    // -- Derived views ---------------------------------------------------

    /// Number of centers passing the filter.
    pub fn result_count(&self) -> usize {
        self.visible_indices.len()
    }

    pub fn map_view(&self) -> Option<MapView> {
        let table = self.table.as_ref()?;
        Some(build_map_view(table, &self.visible_indices))
    }

    pub fn table_view(&self) -> Option<TableView> {
        let table = self.table.as_ref()?;
        Some(build_table_view(table, &self.visible_indices))
    }

    /// Upper bound of the distance slider.
    pub fn distance_slider_max(&self) -> f64 {
        self.table
            .as_ref()
            .and_then(CenterTable::max_distance)
            .unwrap_or(DEFAULT_SLIDER_MAX)
    }

    /// Upper bound of the time slider.
    pub fn time_slider_max(&self) -> f64 {
        self.table
            .as_ref()
            .and_then(CenterTable::max_time)
            .unwrap_or(DEFAULT_SLIDER_MAX)
    }

    /// Most recent load error, for the top bar.
    pub fn last_error(&self) -> Option<&str> {
        self.statuses
            .iter()
            .rev()
            .find(|s| s.level == StatusLevel::Error)
            .map(|s| s.text.as_str())
    }

    // -- Internals -------------------------------------------------------

    fn ingest(
        &mut self,
        result: Result<CenterTable, LoadError>,
        loaded_level: StatusLevel,
        loaded_message: &str,
    ) {
        self.statuses.clear();
        self.filter = ActiveFilter::none();

        match result {
            Ok(table) => {
                self.statuses
                    .push(StatusMessage::new(loaded_level, loaded_message));
                let report = table.report;
                if report.swapped > 0 {
                    self.statuses.push(StatusMessage::new(
                        StatusLevel::Info,
                        format!(
                            "Se han corregido {} pares de coordenadas (COORDENADA_X y \
                             COORDENADA_Y) que parecían estar intercambiadas.",
                            report.swapped
                        ),
                    ));
                }
                if report.dropped > 0 {
                    self.statuses.push(StatusMessage::new(
                        StatusLevel::Warning,
                        format!(
                            "Se han omitido {} filas debido a valores erróneos (como 'ERROR' o \
                             coordenadas inválidas) en las columnas de distancia, tiempo o \
                             coordenadas.",
                            report.dropped
                        ),
                    ));
                }
                self.color_map = Some(ColorMap::for_center_types(&table));
                self.table = Some(table);
            }
            Err(e) => {
                log::error!("Failed to load centers: {e}");
                let text = match &e {
                    LoadError::NoValidRows(_) => "No se han podido cargar datos válidos de \
                         centros. Por favor, sube un archivo CSV con el formato correcto y \
                         asegúrate de que las columnas de coordenadas son numéricas."
                        .to_string(),
                    other => format!(
                        "Error al leer el archivo CSV: {other}. Asegúrate de que el formato \
                         sea correcto (ej. separador ',')."
                    ),
                };
                self.statuses.push(StatusMessage::new(StatusLevel::Error, text));
                self.table = None;
                self.color_map = None;
            }
        }
        self.refilter();
    }

    /// Recompute `visible_indices` after a data or filter change.
    fn refilter(&mut self) {
        self.visible_indices = match &self.table {
            Some(table) => filtered_indices(table, &self.filter),
            None => Vec::new(),
        };
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::ExtractError;
    use crate::data::sample::EXAMPLE_CSV;

    /// Answers every prompt with the same text.
    struct FixedReply(&'static str);

    impl FilterExtractor for FixedReply {
        fn complete(&self, _prompt: &str) -> Result<String, ExtractError> {
            Ok(self.0.to_string())
        }
    }

    struct Offline;

    impl FilterExtractor for Offline {
        fn complete(&self, _prompt: &str) -> Result<String, ExtractError> {
            Err(ExtractError::EmptyReply)
        }
    }

    fn sample_session() -> Session {
        let mut session = Session::new(SwapRule::SignPattern);
        session.on_sample_requested();
        session
    }

    #[test]
    fn sample_load_reports_swaps_and_drops() {
        let session = sample_session();
        assert_eq!(session.result_count(), 8);
        let levels: Vec<StatusLevel> = session.statuses.iter().map(|s| s.level).collect();
        assert_eq!(
            levels,
            [StatusLevel::Info, StatusLevel::Info, StatusLevel::Warning]
        );
        assert!(session.statuses[1].text.starts_with("Se han corregido 1 "));
        assert!(session.statuses[2].text.starts_with("Se han omitido 2 "));
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn km_query_sets_distance_filter() {
        let mut session = sample_session();
        session.on_filter_submitted(
            "Quiero ver los centros a 50 km de Santiago.",
            &FixedReply(r#"{"valor": 50, "unidad": "km"}"#),
        );

        assert_eq!(session.filter, ActiveFilter::distance(50.0));
        assert_eq!(session.result_count(), 3);
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].role, Role::User);
        assert!(session.history[1].content.contains("**50 km**"));
    }

    #[test]
    fn each_query_replaces_previous_filter_and_history() {
        let mut session = sample_session();
        session.on_filter_submitted("a 50 km", &FixedReply(r#"{"valor": 50, "unidad": "km"}"#));
        session.on_filter_submitted(
            "a 60 minutos",
            &FixedReply(r#"{"valor": 60, "unidad": "minutos"}"#),
        );

        assert_eq!(session.filter, ActiveFilter::time(60.0));
        // A, B, C, E, I
        assert_eq!(session.result_count(), 5);
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].content, "a 60 minutos");
    }

    #[test]
    fn unrecognized_query_keeps_previous_filter() {
        let mut session = sample_session();
        session.on_filter_submitted("a 50 km", &FixedReply(r#"{"valor": 50, "unidad": "km"}"#));
        session.on_filter_submitted("Simplemente quiero ver los centros.", &FixedReply("{}"));

        assert_eq!(session.filter, ActiveFilter::distance(50.0));
        assert_eq!(session.result_count(), 3);
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].content, "Simplemente quiero ver los centros.");
        assert!(session.history[1].content.starts_with("No he encontrado filtros válidos"));
    }

    #[test]
    fn unknown_unit_asks_for_km_or_minutes() {
        let mut session = sample_session();
        session.on_filter_submitted("a 60 minutos", &FixedReply(r#"{"valor": 60, "unidad": "minutos"}"#));
        session.on_filter_submitted("a 2 horas", &FixedReply(r#"{"valor": 2, "unidad": "horas"}"#));

        assert_eq!(session.filter, ActiveFilter::time(60.0));
        assert_eq!(session.result_count(), 5);
        assert_eq!(
            session.history[1].content,
            "No he podido entender tu petición. Por favor, especifica la distancia en 'km' o \
             el tiempo en 'minutos'."
        );
    }

    #[test]
    fn service_failure_is_not_fatal() {
        let mut session = sample_session();
        session.on_threshold_changed(Threshold::Distance, 1.0);
        session.on_filter_submitted("a 50 km", &Offline);
        assert_eq!(session.filter, ActiveFilter::distance(1.0));
        assert_eq!(session.result_count(), 2);
        assert_eq!(session.history.len(), 2);
    }

    #[test]
    fn sliders_combine_thresholds() {
        let mut session = sample_session();
        assert_eq!(session.distance_slider_max(), 120.0);
        assert_eq!(session.time_slider_max(), 95.0);

        session.on_threshold_changed(Threshold::Distance, 100.0);
        session.on_threshold_changed(Threshold::Time, 60.0);
        assert_eq!(session.result_count(), 5);
    }

    #[test]
    fn clearing_filter_shows_everything() {
        let mut session = sample_session();
        session.on_threshold_changed(Threshold::Distance, 1.0);
        assert_eq!(session.result_count(), 2);

        session.on_filter_cleared();
        assert!(session.filter.is_unconstrained());
        assert_eq!(session.result_count(), 8);
    }

    #[test]
    fn empty_result_renders_fallbacks() {
        let mut session = sample_session();
        session.on_threshold_changed(Threshold::Distance, 0.1);

        assert_eq!(session.result_count(), 0);
        let map = session.map_view().unwrap();
        assert!(map.markers.is_empty());
        assert!(map.notice.is_some());
        assert!(session.table_view().unwrap().placeholder.is_some());
    }

    #[test]
    fn failed_upload_clears_table_and_reports_error() {
        let mut session = sample_session();
        session.on_file_uploaded(b"Nome\nCentro A");

        assert!(session.table.is_none());
        assert_eq!(session.result_count(), 0);
        assert!(session.map_view().is_none());
        assert!(session.table_view().is_none());
        assert!(session.last_error().unwrap().contains("Error al leer el archivo CSV"));
        assert_eq!(session.distance_slider_max(), DEFAULT_SLIDER_MAX);
    }

    #[test]
    fn invalid_utf8_upload_clears_table() {
        let mut bytes = EXAMPLE_CSV.as_bytes().to_vec();
        bytes.extend_from_slice(b"11,Centro \xff,Calle,Lugo,Lugo,27001,982,Colegio,43.0,-7.5,P\xfablica,No,S\xed,90,70\n");
        let mut session = sample_session();
        session.on_file_uploaded(&bytes);

        assert!(session.table.is_none());
        assert_eq!(session.result_count(), 0);
        assert!(session.last_error().unwrap().contains("Error al leer el archivo CSV"));
    }

    #[test]
    fn opened_file_is_loaded_like_an_upload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, EXAMPLE_CSV.as_bytes()).unwrap();
        let mut session = Session::new(SwapRule::SignPattern);
        session.on_file_opened(file.path());

        assert_eq!(session.result_count(), 8);
        assert_eq!(session.statuses[0].text, "Archivo CSV cargado exitosamente.");
    }

    #[test]
    fn unreadable_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = sample_session();
        session.on_file_opened(&dir.path().join("no_existe.csv"));

        assert!(session.table.is_none());
        assert!(session.last_error().unwrap().contains("Error al leer el archivo CSV"));
    }

    #[test]
    fn upload_with_no_valid_rows_reports_error() {
        let header = EXAMPLE_CSV.lines().next().unwrap();
        let text = format!("{header}\n1,A,B,C,D,E,F,G,42.8,-8.5,H,I,J,ERROR,3");
        let mut session = Session::new(SwapRule::SignPattern);
        session.on_file_uploaded(text.as_bytes());

        assert!(session.table.is_none());
        assert!(session.last_error().unwrap().starts_with("No se han podido cargar"));
    }

    #[test]
    fn new_upload_resets_filter() {
        let mut session = sample_session();
        session.on_threshold_changed(Threshold::Distance, 1.0);
        session.on_file_uploaded(EXAMPLE_CSV.as_bytes());

        assert!(session.filter.is_unconstrained());
        assert_eq!(session.result_count(), 8);
        assert_eq!(session.statuses[0].text, "Archivo CSV cargado exitosamente.");
    }

    #[test]
    fn generation_advances_on_every_recompute() {
        let mut session = sample_session();
        let before = session.generation;
        session.on_threshold_changed(Threshold::Time, 10.0);
        assert!(session.generation > before);
    }
}
