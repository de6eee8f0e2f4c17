// Query value shapes
pub const NSU_WIDTH: usize = 15;
pub const ZERO_NSU: &str = "000000000000000";
pub const CHAVE_NFE_LEN: usize = 44;

// Query families (grupo) and their selectors (consulta)
pub const GRUPO_DIST_NSU: &str = "distNSU";
pub const GRUPO_CONS_CH_NFE: &str = "consChNFe";
pub const GRUPO_CONS_NSU: &str = "consNSU";
pub const CONSULTA_ULT_NSU: &str = "ultNSU";
pub const CONSULTA_CH_NFE: &str = "chNFe";
pub const CONSULTA_NSU: &str = "NSU";
