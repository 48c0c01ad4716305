//! Paginación de listados servidos por el backend
//!
//! El `Pager` solo lleva la cuenta de la página pedida; los datos siempre se
//! vuelven a pedir al backend cuando cambia la página o el tamaño.

/// Cantidad de botones numéricos que muestra el paginador
pub const PAGE_WINDOW: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    per_page: u32,
    pages: u32,
    total: u64,
}

impl Pager {
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            pages: 0,
            total: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// Total reportado por el servidor (no el conteo filtrado)
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Ir a una página, acotada a `[1, pages]`; devuelve true si cambió
    pub fn set_page(&mut self, page: u32) -> bool {
        let upper = self.pages.max(1);
        let target = page.clamp(1, upper);
        let changed = target != self.page;
        self.page = target;
        changed
    }

    /// Cambiar el tamaño de página siempre vuelve a la página 1
    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    pub fn next(&mut self) -> bool {
        self.set_page(self.page.saturating_add(1))
    }

    /// Registrar lo que informó el backend para la página pedida
    pub fn record(&mut self, total: u64, pages: u32) {
        self.total = total;
        self.pages = pages;
    }

    /// Números de página a mostrar, centrados en la actual cuando se puede
    pub fn page_window(&self) -> Vec<u32> {
        let pages = self.pages;
        if pages <= PAGE_WINDOW {
            return (1..=pages).collect();
        }

        let start = if self.page <= 3 {
            1
        } else if self.page >= pages - 2 {
            pages - PAGE_WINDOW + 1
        } else {
            self.page - 2
        };
        (start..start + PAGE_WINDOW).collect()
    }

    /// Nunca más de `per_page` filas en pantalla
    pub fn visible<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let limit = (self.per_page as usize).min(rows.len());
        &rows[..limit]
    }
}
