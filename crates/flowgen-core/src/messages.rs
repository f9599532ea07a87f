//! Fixed user-facing messages.
//!
//! Underlying error details never reach the user; they go to the log.

pub const GENERATION_FAILED: &str = "Não foi possível gerar. Tente novamente.";
pub const RENDER_INVALID_SYNTAX: &str = "Erro na sintaxe do diagrama.";
pub const RENDER_INVALID_HINT: &str = "A IA gerou um código inválido. Tente novamente.";
pub const EXPORT_IMAGE_LOAD_FAILED: &str = "Erro ao preparar imagem para PDF.";
pub const EXPORT_DOCUMENT_FAILED: &str = "Erro ao exportar PDF. Tente baixar como SVG.";
pub const SOURCE_COPIED: &str = "Código copiado!";
